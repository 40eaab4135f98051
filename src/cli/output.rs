use colored::Colorize;
use serde::Serialize;

use crate::error::Ya360Error;
use crate::resources::groups::GroupMembers;
use crate::resources::{Department, Group, Listing, Organization, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
}

impl OutputMode {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

/// Something that can be rendered as one line of pretty output.
pub trait Row {
    fn row(&self) -> String;
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

impl Row for Organization {
    fn row(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.id,
            or_dash(self.name.as_deref()),
            or_dash(self.subscription_plan.as_deref())
        )
    }
}

impl Row for User {
    fn row(&self) -> String {
        let full_name = self
            .name
            .as_ref()
            .map(|n| format!("{} {}", n.first, n.last).trim().to_string())
            .unwrap_or_default();
        format!(
            "{}\t{}\t{}\t{}",
            self.id,
            or_dash(self.nickname.as_deref()),
            or_dash(Some(&full_name)),
            or_dash(self.email.as_deref())
        )
    }
}

impl Row for Group {
    fn row(&self) -> String {
        format!(
            "{}\t{}\t{} members",
            self.id,
            or_dash(self.name.as_deref()),
            self.members_count.unwrap_or(self.members.len() as u64)
        )
    }
}

impl Row for Department {
    fn row(&self) -> String {
        format!(
            "{}\t{}\tparent {}",
            self.id,
            or_dash(self.name.as_deref()),
            or_dash(self.parent_id.as_deref())
        )
    }
}

/// Render a listing. Pretty mode warns on stderr when pages were lost.
pub fn render_listing<T: Row + Serialize>(
    listing: &Listing<T>,
    mode: OutputMode,
    is_tty: bool,
) -> (String, Option<String>) {
    let warning = if listing.is_complete() {
        None
    } else {
        let pages = listing
            .failed_pages
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let msg = format!("warning: result is incomplete, failed pages: {pages}");
        Some(if is_tty {
            msg.yellow().to_string()
        } else {
            msg
        })
    };

    let body = match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "items": listing.items,
            "complete": listing.is_complete(),
            "failedPages": listing.failed_pages,
        }))
        .unwrap_or_default(),
        OutputMode::Pretty => listing
            .iter()
            .map(Row::row)
            .collect::<Vec<_>>()
            .join("\n"),
    };
    (body, warning)
}

pub fn print_listing<T: Row + Serialize>(listing: &Listing<T>, mode: OutputMode, is_tty: bool) {
    let (body, warning) = render_listing(listing, mode, is_tty);
    if !body.is_empty() {
        println!("{body}");
    }
    if let Some(warning) = warning {
        eprintln!("{warning}");
    }
}

pub fn print_record<T: Row + Serialize>(record: &T, mode: OutputMode) {
    match mode {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(record).unwrap_or_default());
        }
        OutputMode::Pretty => println!("{}", record.row()),
    }
}

pub fn render_members(members: &GroupMembers, mode: OutputMode, is_tty: bool) -> String {
    if mode == OutputMode::Json {
        return serde_json::to_string_pretty(members).unwrap_or_default();
    }
    let heading = |title: &str| {
        if is_tty {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    };
    let mut lines = Vec::new();
    lines.push(heading("Departments"));
    for d in &members.departments {
        lines.push(format!("  {}\t{}", d.id, or_dash(d.name.as_deref())));
    }
    lines.push(heading("Groups"));
    for g in &members.groups {
        lines.push(format!("  {}\t{}", g.id, or_dash(g.name.as_deref())));
    }
    lines.push(heading("Users"));
    for u in &members.users {
        lines.push(format!(
            "  {}\t{}\t{}",
            u.id,
            or_dash(u.nickname.as_deref()),
            or_dash(u.email.as_deref())
        ));
    }
    lines.join("\n")
}

pub fn print_error(err: &Ya360Error, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&err.to_json()).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
    }
}
