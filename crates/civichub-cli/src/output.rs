//! Table and JSON output formatting for CLI commands.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};

use civichub_entity::account::{Account, AccountView};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One line of `account list`.
#[derive(Debug, Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Username")]
    pub username: String,
    #[tabled(rename = "Role")]
    pub role: String,
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            username: account.username.clone(),
            role: account.role.to_string(),
            created_at: timestamp(account.created_at),
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print one account in the selected format
pub fn print_account(account: &Account, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            print_kv("ID", &account.id.to_string());
            print_kv("Email", &account.email);
            print_kv("Username", &account.username);
            print_kv("Role", account.role.as_str());
            print_kv("Created", &timestamp(account.created_at));
            print_kv("Updated", &timestamp(account.updated_at));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&AccountView::from(account))
                .unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print any serializable value as JSON
pub fn print_json<T: Serialize>(item: &T) {
    let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
