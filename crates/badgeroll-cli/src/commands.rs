//! Command handlers. Everything but `configure` goes through the coordinator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde::Serialize;
use tracing::{info, warn};

use badgeroll_core::auth::CredentialStore;
use badgeroll_core::models::ExportDocument;
use badgeroll_core::utils::truncate;
use badgeroll_core::{Config, Coordinator, Member, MemberPatch, NewMember};

use crate::cli::{ConfigureArgs, RegisterArgs, UpdateArgs};
use crate::photo;

/// Column widths for `list`
const NAME_WIDTH: usize = 28;
const ROLE_WIDTH: usize = 18;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_member(member: &Member) {
    println!("{}", member.full_name());
    println!("  id:          {}", member.id);
    println!("  role:        {}", member.role);
    println!("  contact:     {}", member.contact);
    println!("  baptism:     {}", member.baptism_date);
    println!("  membership:  {}", member.membership_date);
    println!("  qr code:     {}", member.qr_code);
    println!(
        "  registered:  {}",
        member.registered_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!("  photo:       {}", if member.photo.is_empty() { "none" } else { "yes" });
}

#[derive(Serialize)]
struct StatusReport {
    configured: bool,
    remote: String,
    cache_age: Option<String>,
    cache_stale: bool,
    members: usize,
}

pub async fn status(coordinator: &Coordinator, json: bool) -> Result<()> {
    // A list call is the cheapest way to learn whether the remote answers
    let members = coordinator.list_members().await.len();
    let report = StatusReport {
        configured: coordinator.is_configured(),
        remote: coordinator.availability().to_string(),
        cache_age: coordinator.cache_age(),
        cache_stale: coordinator.is_cache_stale(),
        members,
    };

    if json {
        return print_json(&report);
    }
    println!("Remote:  {}", report.remote);
    match report.cache_age {
        Some(age) if report.cache_stale => println!("Cache:   {} (stale)", age),
        Some(age) => println!("Cache:   {}", age),
        None => println!("Cache:   empty"),
    }
    println!("Members: {}", report.members);
    if !report.configured {
        println!("Run `badgeroll configure --url <project url>` to connect to the member directory");
    }
    Ok(())
}

pub fn configure(args: ConfigureArgs) -> Result<()> {
    let url = args.url.trim().trim_end_matches('/').to_string();
    let api_key = rpassword::prompt_password("Access key: ").context("Failed to read access key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("Access key cannot be empty");
    }

    CredentialStore::store_api_key(&url, api_key)?;

    let mut config = Config::load()?;
    if let Some(previous) = config.remote_url.as_deref().filter(|p| *p != url) {
        // The old key is useless once the URL changes
        if let Err(e) = CredentialStore::delete_api_key(previous) {
            warn!(url = previous, error = %e, "Failed to remove old access key");
        }
    }
    config.remote_url = Some(url.clone());
    if args.country_prefix.is_some() {
        config.country_prefix = args.country_prefix;
    }
    if args.timeout.is_some() {
        config.request_timeout_secs = args.timeout;
    }
    config.save().context("Failed to save configuration")?;

    info!(url = %url, "Remote configured");
    println!("Configured {}", url);
    Ok(())
}

pub async fn list(coordinator: &Coordinator, limit: Option<usize>, json: bool) -> Result<()> {
    let mut members = coordinator.list_members().await;
    if let Some(limit) = limit {
        members.truncate(limit);
    }

    if json {
        return print_json(&members);
    }
    if members.is_empty() {
        println!("No members");
        return Ok(());
    }
    for m in &members {
        println!(
            "{:<name$}  {:<role$}  {:<16}  {}",
            truncate(&m.full_name(), NAME_WIDTH),
            truncate(&m.role, ROLE_WIDTH),
            m.contact,
            m.id,
            name = NAME_WIDTH,
            role = ROLE_WIDTH,
        );
    }
    Ok(())
}

pub async fn show(coordinator: &Coordinator, id: &str, json: bool) -> Result<()> {
    let member = coordinator.get_member(id).await?;
    if json {
        return print_json(&member);
    }
    print_member(&member);
    Ok(())
}

pub async fn register(coordinator: &Coordinator, args: RegisterArgs, json: bool) -> Result<()> {
    let photo = match args.photo {
        Some(path) => photo::to_data_uri(&path)?,
        None => String::new(),
    };

    let fields = NewMember {
        surname: args.surname,
        given_names: args.given_names,
        role: args.role,
        contact: args.contact,
        baptism_date: args.baptism_date.unwrap_or_default(),
        membership_date: args.membership_date.unwrap_or_default(),
        photo,
        qr_code: None,
    };
    let member = coordinator.create_member(fields).await?;

    if json {
        return print_json(&member);
    }
    println!("Registered {} ({})", member.full_name(), member.id);
    Ok(())
}

pub async fn update(coordinator: &Coordinator, args: UpdateArgs, json: bool) -> Result<()> {
    let photo = args.photo.as_deref().map(photo::to_data_uri).transpose()?;

    let patch = MemberPatch {
        surname: args.surname,
        given_names: args.given_names,
        role: args.role,
        contact: args.contact,
        baptism_date: args.baptism_date,
        membership_date: args.membership_date,
        photo,
        qr_code: None,
    };
    let member = coordinator.update_member(&args.id, patch).await?;

    if json {
        return print_json(&member);
    }
    println!("Updated {} ({})", member.full_name(), member.id);
    Ok(())
}

#[derive(Serialize)]
struct DeleteReport<'a> {
    id: &'a str,
    deleted: bool,
}

pub async fn delete(coordinator: &Coordinator, id: &str, json: bool) -> Result<()> {
    let deleted = coordinator.delete_member(id).await?;
    if json {
        return print_json(&DeleteReport { id, deleted });
    }
    if deleted {
        println!("Deleted {}", id);
    } else {
        println!("No member with id {}", id);
    }
    Ok(())
}

#[derive(Serialize)]
struct FileReport {
    path: PathBuf,
    members: usize,
}

/// The default file name carries the UTC date
pub async fn export(coordinator: &Coordinator, output: Option<PathBuf>, json: bool) -> Result<()> {
    let bytes = coordinator.export_snapshot().await?;
    let members = serde_json::from_slice::<ExportDocument>(&bytes)?.members.len();
    let path = output.unwrap_or_else(|| PathBuf::from(ExportDocument::file_name(Utc::now().date_naive())));
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    if json {
        return print_json(&FileReport { path, members });
    }
    println!("Exported {} members to {}", members, path.display());
    Ok(())
}

pub async fn import(coordinator: &Coordinator, path: PathBuf, json: bool) -> Result<()> {
    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let members = coordinator.import_snapshot(&bytes).await?.len();

    if json {
        return print_json(&FileReport { path, members });
    }
    println!("Imported {}; directory now holds {} members", path.display(), members);
    Ok(())
}

pub async fn stats(coordinator: &Coordinator, json: bool) -> Result<()> {
    let stats = coordinator.stats().await;
    if json {
        return print_json(&stats);
    }
    println!("Total members:    {}", stats.total);
    println!("Registered today: {}", stats.registered_today);
    Ok(())
}

/// Badge data is always JSON; laying out the cards is up to the renderer.
pub async fn badges(coordinator: &Coordinator, id: Option<&str>) -> Result<()> {
    let sheet = coordinator.badge_sheet(id).await?;
    if sheet.is_empty() {
        eprintln!("No members to print");
    }
    print_json(&sheet)
}
