// Padxlate Transform Module
// Binding translation for emulator input backends

pub mod translator;

pub use translator::{Protocol, Translator};
