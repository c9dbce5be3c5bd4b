//! Session commands: login, register, logout, password recovery.

use clap::Subcommand;
use secrecy::SecretString;

use mercadito_client::session::Registration;
use mercadito_client::{ApiClient, ApiError};
use mercadito_core::Email;

fn parse_email(email: &str) -> Result<Email, ApiError> {
    Email::parse(email).map_err(|e| ApiError::Validation(e.to_string()))
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with email and password
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account (logs in on success)
    Register {
        /// Display name
        #[arg(long)]
        full_name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the stored session and cart identifier
    Logout,
    /// Show the logged-in identity
    Whoami,
    /// Email a one-time password for account recovery
    ForgotPassword {
        /// Account email
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password using the emailed OTP
    ResetPassword {
        /// New password
        #[arg(short, long)]
        password: String,

        /// One-time password from the recovery email
        #[arg(long)]
        otp: String,

        /// Opaque user reference from the recovery link
        #[arg(long)]
        uidb64: String,
    },
}

pub async fn run(client: &ApiClient, action: AuthAction) -> Result<(), ApiError> {
    match action {
        AuthAction::Login { email, password } => {
            let email = parse_email(&email)?;
            let identity = client
                .session()
                .login(&email, &SecretString::from(password))
                .await?;
            println!(
                "Logged in as {} (user {})",
                identity.full_name.as_deref().unwrap_or(email.as_str()),
                identity.user_id
            );
            if let Some(vendor_id) = identity.vendor() {
                println!("Vendor account: {vendor_id}");
            }
            Ok(())
        }
        AuthAction::Register {
            full_name,
            email,
            phone,
            password,
        } => {
            let registration = Registration {
                full_name,
                email: parse_email(&email)?,
                phone,
                password: SecretString::from(password.clone()),
                password2: SecretString::from(password),
            };
            let identity = client.session().register(&registration).await?;
            println!("Account created, logged in as user {}", identity.user_id);
            Ok(())
        }
        AuthAction::Logout => {
            client.session().logout();
            println!("Logged out");
            Ok(())
        }
        AuthAction::Whoami => {
            match client.session().identity() {
                Some(identity) => {
                    println!("user_id: {}", identity.user_id);
                    if let Some(name) = &identity.full_name {
                        println!("name: {name}");
                    }
                    if let Some(email) = &identity.email {
                        println!("email: {email}");
                    }
                    match identity.vendor() {
                        Some(vendor_id) => println!("vendor_id: {vendor_id}"),
                        None => println!("vendor_id: none"),
                    }
                }
                None => println!("Not logged in"),
            }
            Ok(())
        }
        AuthAction::ForgotPassword { email } => {
            let started = client.request_password_reset(&parse_email(&email)?).await?;
            println!(
                "{}",
                started
                    .message
                    .unwrap_or_else(|| "Check your inbox for the recovery code".to_string())
            );
            Ok(())
        }
        AuthAction::ResetPassword {
            password,
            otp,
            uidb64,
        } => {
            let changed = client
                .change_password(&SecretString::from(password), &otp, &uidb64)
                .await?;
            println!(
                "{}",
                changed
                    .message
                    .unwrap_or_else(|| "Password changed".to_string())
            );
            Ok(())
        }
    }
}
