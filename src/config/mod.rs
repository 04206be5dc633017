//! Configuration management module

pub mod builder;
pub mod resolver;
pub mod settings;
pub mod submodules;
pub mod target;

pub use builder::TargetSourceBuilder;
pub use resolver::resolve_target;
pub use settings::{CheckoutOptions, NetrcSettings, PullRequestRefPolicy, Settings};
pub use submodules::{SubmoduleOverride, SubmoduleOverrides};
pub use target::{BuildEvent, CheckoutTarget, TargetSource};
