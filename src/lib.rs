// ABOUTME: Library root for beanpole - application version deployment and polling.
// ABOUTME: Hosts supply a BeanstalkApi adapter and a ProgressSink, then run a DeploymentPlan.

pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod progress;
pub mod provider;
pub mod types;
