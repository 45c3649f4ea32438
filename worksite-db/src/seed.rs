//! Demo data for trying out local mode.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use worksite_core::{ProjectDraft, ProjectStatus, Stage};

use crate::operations::{insert_project, OperationError};

struct DemoJob {
    name: &'static str,
    address: &'static str,
    client: &'static str,
    phone: &'static str,
    sales: &'static str,
    installer: &'static str,
    team: &'static str,
    stages: &'static [Stage],
}

const DEMO_JOBS: &[DemoJob] = &[
    DemoJob {
        name: "Ponsonby villa retrofit",
        address: "12 Jervois Rd, Ponsonby, Auckland",
        client: "Aroha Ngata",
        phone: "021 555 0101",
        sales: "Tim",
        installer: "Peter",
        team: "Peter, Jack",
        stages: &[Stage::Frame, Stage::Glass],
    },
    DemoJob {
        name: "Parnell apartment sliders",
        address: "88 Parnell Rd, Parnell, Auckland",
        client: "James Wong",
        phone: "022 555 0132",
        sales: "Amy",
        installer: "Sione",
        team: "Sione, Mere",
        stages: &[Stage::Install],
    },
    DemoJob {
        name: "Mt Eden bay window",
        address: "4 Valley Rd, Mt Eden, Auckland",
        client: "Olivia Smith",
        phone: "027 555 0145",
        sales: "Tim",
        installer: "Jack",
        team: "Jack",
        stages: &[Stage::Repair, Stage::Glass],
    },
    DemoJob {
        name: "Takapuna beach house",
        address: "21 The Strand, Takapuna, Auckland",
        client: "Liam Patel",
        phone: "021 555 0178",
        sales: "Amy",
        installer: "Peter",
        team: "Peter, Sione",
        stages: &[Stage::Purchase, Stage::Transport],
    },
    DemoJob {
        name: "Devonport heritage sashes",
        address: "9 Victoria Rd, Devonport, Auckland",
        client: "Hana Kim",
        phone: "029 555 0190",
        sales: "Rawiri",
        installer: "Mere",
        team: "Mere, Jack",
        stages: &[Stage::Repair],
    },
    DemoJob {
        name: "Newmarket office fit-out",
        address: "277 Broadway, Newmarket, Auckland",
        client: "Chen Li",
        phone: "09 555 0111",
        sales: "Rawiri",
        installer: "Sione",
        team: "Sione, Peter, Jack",
        stages: &[Stage::Transport, Stage::Install],
    },
    DemoJob {
        name: "Remuera double glazing",
        address: "350 Remuera Rd, Remuera, Auckland",
        client: "Sophie Brown",
        phone: "021 555 0123",
        sales: "Tim",
        installer: "Jack",
        team: "Jack, Mere",
        stages: &[Stage::Glass],
    },
    DemoJob {
        name: "Grey Lynn kitchen doors",
        address: "45 Richmond Rd, Grey Lynn, Auckland",
        client: "Tama Walker",
        phone: "022 555 0156",
        sales: "Amy",
        installer: "Peter",
        team: "Peter",
        stages: &[Stage::Frame],
    },
    DemoJob {
        name: "Henderson new build",
        address: "12 Great North Rd, Henderson, Auckland",
        client: "Priya Singh",
        phone: "027 555 0167",
        sales: "Rawiri",
        installer: "Mere",
        team: "Mere, Sione",
        stages: &[Stage::Purchase, Stage::Frame, Stage::Install],
    },
    DemoJob {
        name: "Howick conservatory",
        address: "60 Picton St, Howick, Auckland",
        client: "Grace Taylor",
        phone: "021 555 0189",
        sales: "Tim",
        installer: "Sione",
        team: "Sione, Jack",
        stages: &[Stage::Install, Stage::Glass],
    },
];

/// Top the store up to `target` projects with Auckland demo jobs scheduled
/// around `today`. Returns how many were created; 0 when the store already
/// holds enough.
pub fn seed_demo_projects(
    conn: &Connection,
    target: usize,
    today: NaiveDate,
) -> Result<usize, OperationError> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
    let existing = existing as usize;
    if existing >= target {
        return Ok(0);
    }

    let now = today
        .and_hms_opt(9, 0, 0)
        .unwrap_or_default()
        .and_utc();
    let missing = target - existing;
    for i in 0..missing {
        let job = &DEMO_JOBS[i % DEMO_JOBS.len()];
        let offset = (i as i64 * 3) - 7;
        let start = today + Duration::days(offset);
        let end = start + Duration::days(1 + (i as i64 % 4));
        let status = if end < today {
            ProjectStatus::Completed
        } else if start <= today {
            ProjectStatus::InProgress
        } else {
            ProjectStatus::NotStarted
        };
        let draft = ProjectDraft {
            name: job.name.to_string(),
            address: job.address.to_string(),
            client_name: job.client.to_string(),
            client_phone: job.phone.to_string(),
            sales_person: job.sales.to_string(),
            installer: job.installer.to_string(),
            team_members: job.team.to_string(),
            start_date: Some(start),
            end_date: Some(end),
            status,
            stages: job.stages.iter().copied().collect(),
            ..ProjectDraft::default()
        };
        insert_project(conn, &draft, now)?;
    }

    log::info!("Seeded {} demo project(s)", missing);
    Ok(missing)
}
