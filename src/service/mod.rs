pub use views::*;

mod views;
