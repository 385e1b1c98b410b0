//! Scroll-synchronized hero title that docks into the navigation bar.
//!
//! Everything here is target independent: the browser bindings in
//! `frontend::dock` feed a [`DockSession`] with scroll offsets, font readiness
//! and anchor measurements, then render whatever [`TitleFrame`] it plans.

mod config;
mod frame;
mod geometry;
mod motion;
mod session;
mod tracker;

pub use config::DockConfig;
pub use frame::{ClonePlan, TitleFrame, TitleOwner};
pub use geometry::{Measurement, Rect, TextStyleSnapshot, Viewport};
pub use motion::ScrollState;
pub use session::DockSession;
pub use tracker::{AnchorSlots, AnimationEligibility, DockPhase, DockTracker};
