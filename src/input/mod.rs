pub mod keyboard;
pub mod quick_add;

pub use keyboard::handle_key_input;
