// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod booking;
pub mod ids;
pub mod model;
pub mod state;
pub mod stepper;
pub mod stepper_view;
pub mod transcript;
pub mod triggers;

pub use booking::*;
pub use ids::*;
pub use model::*;
pub use state::*;
pub use stepper::*;
pub use stepper_view::*;
pub use transcript::{APOLOGY, ChatTranscript, GREETING};
pub use triggers::*;
