pub mod console;
pub mod editor;
pub mod notifier;
