//! Session commands.

use clap::Args;
use secrecy::SecretString;

use creator_market_core::UserRole;
use creator_market_storefront::services::FieldErrors;
use creator_market_storefront::services::auth::{CreatorSignup, SignupForm, handle_from_name};
use creator_market_storefront::{AppError, AppState};

/// Arguments for `signup`.
#[derive(Args)]
pub struct SignupArgs {
    #[arg(short, long)]
    name: String,

    #[arg(short, long)]
    email: String,

    #[arg(short, long)]
    password: String,

    /// Repeat the password
    #[arg(long)]
    confirm_password: String,

    /// Open a creator shop
    #[arg(long)]
    creator: bool,

    /// Shop handle (defaults to one derived from the name)
    #[arg(long, requires = "creator")]
    handle: Option<String>,

    #[arg(long, default_value_t)]
    bio: String,

    #[arg(long, default_value = "Fashion")]
    category: String,

    /// Accept the terms and conditions
    #[arg(long)]
    accept_terms: bool,
}

pub async fn login(
    state: &AppState,
    email: &str,
    password: String,
    role: UserRole,
) -> Result<(), AppError> {
    state
        .login(email, &SecretString::from(password), role)
        .await?;
    whoami(state).await;
    Ok(())
}

pub async fn signup(state: &AppState, args: SignupArgs) -> Result<(), AppError> {
    let creator = args.creator.then(|| CreatorSignup {
        handle: args
            .handle
            .clone()
            .unwrap_or_else(|| handle_from_name(&args.name)),
        bio: args.bio,
        category: args.category,
    });
    let form = SignupForm {
        name: args.name,
        email: args.email,
        password: SecretString::from(args.password),
        confirm_password: SecretString::from(args.confirm_password),
        creator,
        accept_terms: args.accept_terms,
    };

    let errors = form.validate();
    if !errors.is_empty() {
        print_field_errors(&errors);
        return Err(AppError::Validation(errors));
    }

    let (user, password) = form.into_signup();
    state.signup(user, &password).await?;
    whoami(state).await;
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.logout().await?;
    println!("Signed out");
    Ok(())
}

/// Print the signed-in user, if any.
pub async fn whoami(state: &AppState) {
    let session = state.session().await;
    let Some(user) = session.user() else {
        println!("Not signed in");
        return;
    };

    println!("{} <{}> ({})", user.name, user.email, user.role);
    if let Some(profile) = &user.creator_profile {
        println!(
            "  shop @{} - {} followers - {}",
            profile.handle,
            profile.followers,
            profile.categories.join(", ")
        );
    }
}

pub(super) fn print_field_errors(errors: &FieldErrors) {
    for (field, message) in errors {
        println!("  {field}: {message}");
    }
}
