mod config;
mod lifecycle;

pub(crate) use config::LifecycleConfig;
pub(crate) use lifecycle::SubmissionLifecycle;
