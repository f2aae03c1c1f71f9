pub mod booking;
pub mod catalog;
pub mod seat;
pub mod user;

pub use booking::{
    Booking, BookingId, Credential, CredentialRef, PaymentReceipt, PaymentStatus, PaymentType,
    Reservation, TicketView, Validity,
};
pub use catalog::{Cinema, Location, ShowingDetails, ShowingView};
pub use seat::{SeatChart, SeatGrid, SeatLabel};
pub use user::{SignUp, User};
