//! Class-imbalance correction for the training split.

pub mod smote;

pub use smote::Smote;
