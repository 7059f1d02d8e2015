// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types and checked constructors so invalid input never reaches the provider.

mod id;
mod names;
mod source_bundle;

pub use id::{EnvironmentId, Id, RequestId};
pub use names::{ApplicationName, EnvironmentName, NameError, VersionLabel};
pub use source_bundle::{SourceBundle, SourceBundleError};
