pub mod item;
pub mod items_page;
pub mod login;
pub mod fixture_user;

pub use item::*;
pub use items_page::*;
pub use login::*;
pub use fixture_user::*;
