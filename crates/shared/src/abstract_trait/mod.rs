pub mod auth;
pub mod payment;
pub mod profile;
pub mod user;

pub use self::auth::{AuthServiceTrait, DynAuthService};

pub use self::payment::{
    DynPaymentService, DynPaymentStatusLookup, PaymentServiceTrait, PaymentStatusLookupTrait,
};

pub use self::profile::{DynProfileService, ProfileServiceTrait};

pub use self::user::{DynUserService, UserServiceTrait};
