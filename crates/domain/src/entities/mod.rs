pub mod blood_type;
pub mod donor;
pub mod emergency_contact;
pub mod gender;
pub mod phone;
pub mod receiver;
pub mod role;
pub mod user;

pub use blood_type::*;
pub use donor::*;
pub use emergency_contact::*;
pub use gender::*;
pub use phone::*;
pub use receiver::*;
pub use role::*;
pub use user::*;
