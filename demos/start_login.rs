//! Walks through building the identity-provider login redirect, validating the returned state,
//! and producing the logout trigger. No network access is required.

// crates.io
use color_eyre::Result;
// self
use authz_probe::{config::IdpSettings, idp::IdentityBroker, url::Url};

fn main() -> Result<()> {
	color_eyre::install()?;

	let settings = IdpSettings::new("your-domain.auth0.com", "your-client-id")
		.with_audience("https://api.example.com");
	let broker = IdentityBroker::new(settings)?;
	let session = broker.start_login(Url::parse("http://localhost:5173/callback")?)?;

	println!("Send your user to {}.", &session.authorize_url);

	// Simulate the redirect handler returning the `state` parameter.
	let returned_state = session.state.clone();

	session.validate_state(&returned_state)?;
	println!("Validated state `{returned_state}`.");
	println!(
		"Exchange the returned code with `IdentityBroker::exchange_code` to obtain the bearer \
		 token."
	);

	let logout = broker.logout_url(&Url::parse("http://localhost:5173/")?)?;

	println!("Log out via {logout}.");

	Ok(())
}
