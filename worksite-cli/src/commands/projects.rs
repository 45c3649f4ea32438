use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use worksite_core::util::format_date;
use worksite_lib::{
    ListQuery, Page, Project, ProjectDraft, ProjectPatch, ProjectStatus, ProjectStore, Stages,
};

use super::{confirm, Context};
use crate::cli_types::ProjectFieldArgs;
use crate::error::CliError;

fn status_colored(status: ProjectStatus) -> String {
    let label = status.label();
    match status {
        ProjectStatus::NotStarted => label.if_supports_color(Stderr, |t| t.dimmed()).to_string(),
        ProjectStatus::InProgress => label.if_supports_color(Stderr, |t| t.cyan()).to_string(),
        ProjectStatus::Completed => label.if_supports_color(Stderr, |t| t.green()).to_string(),
        ProjectStatus::FinalPaymentReceived => {
            label.if_supports_color(Stderr, |t| t.bold()).to_string()
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn date_span(project: &Project) -> String {
    format!(
        "{} -> {}",
        format_date(project.start_date),
        format_date(project.end_date)
    )
}

pub(crate) fn print_page(page: &Page<Project>) {
    if page.items.is_empty() {
        log::info!("No projects found.");
        return;
    }
    log::info!(
        "{}",
        format!(
            "{:<6} {:<28} {:<18} {:<24} {:<14} {}",
            "Code", "Name", "Client", "Dates", "Installer", "Status"
        )
        .if_supports_color(Stderr, |t| t.bold()),
    );
    for p in &page.items {
        log::info!(
            "{:<6} {:<28} {:<18} {:<24} {:<14} {}{}",
            p.project_code,
            truncate(&p.name, 28),
            truncate(&p.client_name, 18),
            date_span(p),
            truncate(&p.installer, 14),
            status_colored(p.status),
            if p.archived {
                format!(" {}", "(archived)".if_supports_color(Stderr, |t| t.dimmed()))
            } else {
                String::new()
            },
        );
    }
    log::info!("");
    log::info!(
        "Page {} of {} ({} project{})",
        page.page,
        page.total_pages(),
        page.total,
        if page.total == 1 { "" } else { "s" },
    );
}

pub(crate) fn print_project(p: &Project) {
    log::info!(
        "{} {}",
        p.project_code.if_supports_color(Stderr, |t| t.bold()),
        p.name.if_supports_color(Stderr, |t| t.bold()),
    );
    let stages: Vec<&str> = p.stages.iter().map(|s| s.label()).collect();
    let fields: [(&str, String); 12] = [
        ("Id", p.id.to_string()),
        ("Status", status_colored(p.status)),
        ("Dates", date_span(p)),
        ("Address", p.address.clone()),
        ("Client", p.client_name.clone()),
        ("Phone", p.client_phone.clone()),
        ("Sales", p.sales_person.clone()),
        ("Installer", p.installer.clone()),
        ("Team", p.team_members.clone()),
        ("Stages", stages.join(", ")),
        ("Today", p.today_task.clone()),
        ("Progress", p.progress_note.clone()),
    ];
    for (label, value) in fields.iter().filter(|(_, v)| !v.is_empty()) {
        log::info!("  {:<10} {}", format!("{label}:"), value);
    }
    if !p.change_note.is_empty() {
        log::info!("  {:<10} {}", "Changes:", p.change_note);
    }
    if !p.photo_url.is_empty() {
        log::info!(
            "  {:<10} {}",
            "Photo:",
            p.photo_url.if_supports_color(Stderr, |t| t.cyan())
        );
    }
    if p.archived {
        log::info!("  {}", "Archived".if_supports_color(Stderr, |t| t.yellow()));
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::other(e.to_string()))
}

pub(crate) async fn run_list(ctx: &Context, query: ListQuery, json: bool) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let page = ctx.wait("Loading projects...", store.list(&query)).await?;
    if json {
        println!("{}", to_json(&page)?);
    } else {
        print_page(&page);
    }
    Ok(())
}

pub(crate) async fn run_show(ctx: &Context, id: i64, json: bool) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let project = ctx.wait("Loading project...", store.get(id)).await?;
    if json {
        println!("{}", to_json(&project)?);
    } else {
        print_project(&project);
    }
    Ok(())
}

/// Build a draft from the flags; missing required fields are reported by
/// validation.
pub(crate) fn draft_from_args(args: ProjectFieldArgs) -> ProjectDraft {
    ProjectDraft {
        name: args.name.unwrap_or_default(),
        address: args.address.unwrap_or_default(),
        client_name: args.client.unwrap_or_default(),
        client_phone: args.phone.unwrap_or_default(),
        sales_person: args.sales.unwrap_or_default(),
        installer: args.installer.unwrap_or_default(),
        team_members: args.team.unwrap_or_default(),
        start_date: args.start,
        end_date: args.end,
        status: args.status.unwrap_or_default(),
        today_task: args.task.unwrap_or_default(),
        progress_note: args.note.unwrap_or_default(),
        stages: args.stages.map(Stages::from_iter).unwrap_or_default(),
    }
}

pub(crate) fn patch_from_args(args: ProjectFieldArgs, change_note: Option<String>) -> ProjectPatch {
    ProjectPatch {
        name: args.name,
        address: args.address,
        client_name: args.client,
        client_phone: args.phone,
        sales_person: args.sales,
        installer: args.installer,
        team_members: args.team,
        start_date: args.start,
        end_date: args.end,
        status: args.status,
        today_task: args.task,
        progress_note: args.note,
        change_note,
        stages: args.stages.map(Stages::from_iter),
        ..ProjectPatch::default()
    }
}

pub(crate) async fn run_create(ctx: &Context, fields: ProjectFieldArgs) -> Result<(), CliError> {
    let draft = draft_from_args(fields);
    let store = ctx.open_store()?;
    let project = ctx.wait("Creating project...", store.create(&draft)).await?;
    log::info!(
        "{} Created {} {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        project.project_code.if_supports_color(Stderr, |t| t.bold()),
        project.name,
    );
    Ok(())
}

pub(crate) async fn run_update(
    ctx: &Context,
    id: i64,
    fields: ProjectFieldArgs,
    change_note: Option<String>,
) -> Result<(), CliError> {
    let patch = patch_from_args(fields, change_note);
    if patch.is_empty() {
        return Err(CliError::input("Nothing to update; pass at least one field flag"));
    }
    let store = ctx.open_store()?;
    let project = ctx.wait("Saving project...", store.update(id, &patch)).await?;
    log::info!(
        "{} Updated {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        project.project_code.if_supports_color(Stderr, |t| t.bold()),
    );
    print_project(&project);
    Ok(())
}

pub(crate) async fn run_archive(ctx: &Context, id: i64, archived: bool) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    let project = ctx.wait("Saving project...", store.archive(id, archived)).await?;
    log::info!(
        "{} {} {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        if archived { "Archived" } else { "Restored" },
        project.project_code.if_supports_color(Stderr, |t| t.bold()),
    );
    Ok(())
}

pub(crate) async fn run_delete(ctx: &Context, id: i64, yes: bool) -> Result<(), CliError> {
    let store = ctx.open_store()?;
    if !yes {
        let project = ctx.wait("Loading project...", store.get(id)).await?;
        let question = format!(
            "Delete {} '{}' and all of its media?",
            project.project_code, project.name
        );
        if !confirm(&question)? {
            log::info!("Cancelled.");
            return Ok(());
        }
    }
    ctx.wait("Deleting project...", store.delete(id)).await?;
    log::info!(
        "{} Deleted project {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use worksite_lib::Stage;

    use super::*;

    #[test]
    fn empty_flags_give_an_empty_patch() {
        assert!(patch_from_args(ProjectFieldArgs::default(), None).is_empty());
        assert!(!patch_from_args(ProjectFieldArgs::default(), Some("moved".into())).is_empty());
    }

    #[test]
    fn draft_maps_flags_to_fields() {
        let args = ProjectFieldArgs {
            name: Some("Deck".into()),
            client: Some("Aroha".into()),
            start: NaiveDate::from_ymd_opt(2025, 10, 1),
            stages: Some(vec![Stage::Install]),
            ..ProjectFieldArgs::default()
        };
        let draft = draft_from_args(args);
        assert_eq!(draft.name, "Deck");
        assert_eq!(draft.client_name, "Aroha");
        assert!(draft.stages.contains(Stage::Install));
        assert_eq!(draft.status, ProjectStatus::NotStarted);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn long_text_is_truncated() {
        assert_eq!(truncate("Harbour view", 7), "Harbou~");
        assert_eq!(truncate("Deck", 7), "Deck");
    }
}
