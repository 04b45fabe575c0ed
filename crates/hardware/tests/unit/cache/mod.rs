//! Cache model tests.




/// Observer notifications.
pub mod observer;


/// Random replacement.
pub mod random;
