//! Authorization service probe. Log in through your identity provider, fire method/path checks at
//! a remote `/authorize` endpoint, and inspect the ALLOW/DENY verdicts.
//!
//! The probe performs exactly one network attempt per submission and classifies the response as a
//! tagged outcome instead of mapping HTTP statuses to success/failure: both `200` and `403` carry
//! a valid [`AuthorizationResponse`](check::AuthorizationResponse), while every other status is a
//! request error and network/parse problems are transport failures.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod check;
pub mod config;
pub mod error;
pub mod http;
pub mod idp;
pub mod obs;
pub mod render;
pub mod session;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
