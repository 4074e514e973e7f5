pub mod chrome;
pub mod element;

pub use chrome::ChromeDriver;
pub use element::{Element, ElementState, Selector};
