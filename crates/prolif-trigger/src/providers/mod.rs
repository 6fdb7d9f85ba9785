//! Built-in trigger providers.

mod automation;
mod custom;
mod github;
mod nango;
mod polling;
mod posthog;
mod scheduled;

pub use automation::AutomationProvider;
pub use custom::CustomProvider;
pub use github::GithubAppProvider;
pub use nango::NangoProvider;
pub use polling::PollingProvider;
pub use posthog::PosthogProvider;
pub use scheduled::ScheduledProvider;
