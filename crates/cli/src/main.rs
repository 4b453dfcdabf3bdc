//! Shopfront CLI - browse, buy and manage your account from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (logs in on success); passwords are read from stdin
//! shopfront register -u alice -e alice@example.com
//!
//! # Log in / out
//! SHOPFRONT_PASSWORD='Pa$w0rd' shopfront login -e alice@example.com
//! shopfront logout
//!
//! # Shop
//! shopfront products
//! shopfront cart add 3 --quantity 2
//! shopfront order
//! ```
//!
//! Configuration comes from the environment (see `shopfront_client::config`).
//! Session and cart survive between runs in the key-value store file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shopfront_client::ShopfrontConfig;
use shopfront_core::forms::{EditProfileForm, LoginForm, RecoverForm, RegisterForm};
use shopfront_core::{ProductId, UserId};

mod commands;
mod telemetry;

use commands::App;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        /// Read from SHOPFRONT_PASSWORD, else prompted on stdin
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Repeat the password; prompted on stdin when omitted
        #[arg(short = 'c', long)]
        confirm_password: Option<String>,
    },
    /// Log in
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from SHOPFRONT_PASSWORD, else prompted on stdin
        #[arg(short, long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change your username and email
    Profile {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,
    },
    /// Request a password recovery email
    Recover {
        #[arg(short, long)]
        email: String,
    },
    /// List the product catalog
    Products,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Place an order for the cart
    Order,
    /// Manage the user directory
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart (default)
    Show,
    /// Add a product
    Add {
        product_id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 removes it)
    Set { product_id: ProductId, quantity: u32 },
    /// Remove a product
    Remove { product_id: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,
    /// Delete a user
    Delete { id: UserId },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ShopfrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            telemetry::init_tracing(cli.json_logs);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = match App::new(config) {
        Ok(app) => run(&app, cli.command).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(app: &App, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Register {
            username,
            email,
            password,
            confirm_password,
        } => {
            let password = commands::secret_or_stdin(password, "Password")?;
            let confirm_password =
                commands::secret_or_stdin(confirm_password, "Confirm password")?;
            let form = RegisterForm {
                username,
                email,
                password,
                confirm_password,
            };
            commands::account::register(app, form).await?;
        }
        Commands::Login { email, password } => {
            let password = commands::secret_or_stdin(password, "Password")?;
            commands::account::login(app, LoginForm { email, password }).await?;
        }
        Commands::Logout => commands::account::logout(app)?,
        Commands::Whoami => commands::account::whoami(app)?,
        Commands::Profile { username, email } => {
            commands::account::edit_profile(app, EditProfileForm { username, email }).await?;
        }
        Commands::Recover { email } => commands::account::recover(&RecoverForm { email })?,
        Commands::Products => commands::shop::products(app).await?,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::shop::show_cart(app)?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::shop::add_to_cart(app, product_id, quantity).await?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::shop::set_quantity(app, product_id, quantity)?,
            CartAction::Remove { product_id } => {
                commands::shop::remove_from_cart(app, product_id)?;
            }
            CartAction::Clear => commands::shop::clear_cart(app)?,
        },
        Commands::Order => commands::shop::place_order(app).await?,
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list(app).await?,
            UserAction::Delete { id } => commands::users::delete(app, id).await?,
        },
    }

    Ok(())
}
