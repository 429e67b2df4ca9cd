mod button;
mod card;
mod inline_error;

pub use button::Button;
pub use card::Card;
pub use inline_error::InlineError;
