pub(crate) mod payout_dispatcher;
pub(crate) mod status_updater;
pub(crate) mod submission_repository;
pub(crate) mod validator;

pub(crate) use payout_dispatcher::PayoutDispatcher;
pub(crate) use status_updater::{StatusUpdateOutcome, StatusUpdater};
pub(crate) use submission_repository::SubmissionRepository;
pub(crate) use validator::SubmissionValidator;
