use std::{fmt::Display, path::Path};

use thiserror::Error;
use tracing::error;

/// Log the error of a fallible background step that nobody is waiting on
pub fn report_error<T>(context: &str, res: &Result<T, impl Display>) {
	if let Err(e) = res {
		error!(%context, "{e:#}");
	}
}

/// File I/O error that includes the path that caused the error
#[derive(Error, Debug)]
pub struct FileIOError {
	pub path: Box<Path>,
	#[source]
	pub source: std::io::Error,
	pub maybe_context: Option<&'static str>,
}

impl Display for FileIOError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"file I/O error{}: {}; path: '{}'",
			self.maybe_context
				.map(|ctx| format!(" ({ctx})"))
				.unwrap_or_default(),
			self.source,
			self.path.display()
		)
	}
}

impl<P: AsRef<Path>> From<(P, std::io::Error)> for FileIOError {
	fn from((path, source): (P, std::io::Error)) -> Self {
		Self {
			path: path.as_ref().into(),
			source,
			maybe_context: None,
		}
	}
}

impl<P: AsRef<Path>> From<(P, std::io::Error, &'static str)> for FileIOError {
	fn from((path, source, context): (P, std::io::Error, &'static str)) -> Self {
		Self {
			path: path.as_ref().into(),
			source,
			maybe_context: Some(context),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::io;

	#[test]
	fn display_includes_path_and_context() {
		let e = FileIOError::from((
			"/tmp/parkhere/device.json",
			io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
			"writing device identity",
		));

		let message = e.to_string();
		assert!(message.contains("(writing device identity)"));
		assert!(message.contains("denied"));
		assert!(message.contains("/tmp/parkhere/device.json"));
	}

	#[test]
	fn display_without_context() {
		let e = FileIOError::from((
			"/tmp/x",
			io::Error::new(io::ErrorKind::NotFound, "missing"),
		));

		assert_eq!(e.to_string(), "file I/O error: missing; path: '/tmp/x'");
	}
}
