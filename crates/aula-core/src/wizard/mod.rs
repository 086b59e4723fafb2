//! The wizard itself: state store, step validation, navigation and the
//! session that ties them to draft persistence.

pub mod catalog;
pub mod navigation;
pub mod session;
pub mod store;
pub mod validator;
