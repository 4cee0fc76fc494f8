use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use nudge_core::{
    calculate_notification_schedule, get_notification_summary, payloads_for, Clock, FixedClock,
    NotificationEngine, NotificationPayload, NotificationSchedule, NotificationType, SystemClock,
    UserProfile,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::{init_config, load_config, Config};
use crate::orchestrator::reconcile;
use crate::state::{
    append_delivered, read_delivered, read_queue, read_tasks, write_queue, write_tasks, Home,
    OverdueLedger,
};

#[derive(Subcommand, Debug)]
pub enum NotifyCommand {
    /// Write a default config.toml and an empty tasks.json
    Init,

    /// Show what would be sent and when, per task
    Preview {
        /// Only this task id
        #[arg(long)]
        task: Option<String>,

        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Recompute all schedules and sync the delivery queue
    Plan,

    /// Hand due payloads to the delivery layer (JSON lines on stdout)
    Dispatch {
        /// Dry-run only; do not record deliveries
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Max payloads in one run (default from config.dispatch.max_per_run)
        #[arg(long)]
        limit: Option<usize>,

        /// Include payloads due within the next N minutes
        #[arg(long)]
        include_future_minutes: Option<i64>,
    },

    /// Totals by priority and type for the current schedules
    Summary {
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Queue status (due/future/delivered)
    Status,

    /// Show the effective profile and dispatch settings
    ConfigCheck,
}

pub fn clock_from(now: Option<DateTime<Utc>>) -> Box<dyn Clock> {
    match now {
        Some(at) => Box::new(FixedClock(at)),
        None => Box::new(SystemClock),
    }
}

pub fn run(cmd: NotifyCommand, home: &Home, clock: Box<dyn Clock>) -> Result<()> {
    match cmd {
        NotifyCommand::Init => init(home),
        NotifyCommand::ConfigCheck => config_check(home),
        NotifyCommand::Status => status(home, clock.now()),
        NotifyCommand::Preview { task, json } => {
            let (_, engine) = engine_for(home, clock)?;
            preview(home, &engine, task, json)
        }
        NotifyCommand::Plan => {
            let (_, engine) = engine_for(home, clock)?;
            plan(home, &engine)
        }
        NotifyCommand::Dispatch {
            dry_run,
            limit,
            include_future_minutes,
        } => {
            let (cfg, engine) = engine_for(home, clock)?;
            dispatch(home, &cfg, &engine, dry_run, limit, include_future_minutes)
        }
        NotifyCommand::Summary { json } => {
            let (_, engine) = engine_for(home, clock)?;
            summary(home, &engine, json)
        }
    }
}

fn engine_for(
    home: &Home,
    clock: Box<dyn Clock>,
) -> Result<(Config, NotificationEngine<Box<dyn Clock>>)> {
    let cfg = load_config(home)?;
    let profile = cfg.user_profile()?;
    info!(timezone = %profile.timezone, now = %clock.now(), "engine ready");
    Ok((cfg, NotificationEngine::new(profile, clock)))
}

fn init(home: &Home) -> Result<()> {
    if init_config(home)? {
        println!("Wrote {}", home.ensure()?.join("config.toml").display());
    } else {
        println!("Config already exists in {}", home.ensure()?.display());
    }

    let tp = home.tasks_path()?;
    if !tp.exists() {
        write_tasks(&tp, &[])?;
        println!("Wrote {}", tp.display());
    }
    Ok(())
}

/// Engine input for "now": every non-completed task with today's overdue counts.
fn compute_schedules<C: Clock>(
    home: &Home,
    engine: &NotificationEngine<C>,
) -> Result<Vec<NotificationSchedule>> {
    let tasks = read_tasks(&home.tasks_path()?)?;
    let ledger = OverdueLedger::load(&home.overdue_counts_path()?)?;
    let today = engine.now().with_timezone(&engine.profile().timezone).date_naive();
    let counts = ledger.counts_for(today);
    debug!(tasks = tasks.len(), %today, "computing schedules");
    Ok(engine.schedule_all(&tasks, &counts))
}

fn preview<C: Clock>(
    home: &Home,
    engine: &NotificationEngine<C>,
    task_id: Option<String>,
    json: bool,
) -> Result<()> {
    let schedules = match task_id {
        Some(id) => {
            let tasks = read_tasks(&home.tasks_path()?)?;
            let task = tasks
                .iter()
                .find(|t| t.id == id)
                .with_context(|| format!("no task with id '{id}'"))?;
            let ledger = OverdueLedger::load(&home.overdue_counts_path()?)?;
            let today = engine.now().with_timezone(&engine.profile().timezone).date_naive();
            let existing = ledger.counts_for(today).get(&id).copied().unwrap_or(0);
            vec![calculate_notification_schedule(
                task,
                engine.profile(),
                existing,
                engine.now(),
            )]
        }
        None => compute_schedules(home, engine)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&schedules)?);
        return Ok(());
    }

    if schedules.is_empty() {
        println!("Nothing to send.");
        return Ok(());
    }

    for s in &schedules {
        print!("{}", render_schedule(s, engine.profile()));
    }
    Ok(())
}

pub fn render_schedule(s: &NotificationSchedule, profile: &UserProfile) -> String {
    let mut out = format!("{} ({})\n", s.task_title, s.task_id);
    if s.notifications.is_empty() {
        out.push_str("  (no notifications)\n");
    }
    for n in &s.notifications {
        out.push_str(&format!(
            "  {}  {:<14}  [{}]  {}\n",
            n.time.with_timezone(&profile.timezone).format("%Y-%m-%d %H:%M %Z"),
            n.kind,
            n.priority,
            n.reason
        ));
    }
    out
}

fn plan<C: Clock>(home: &Home, engine: &NotificationEngine<C>) -> Result<()> {
    let schedules = compute_schedules(home, engine)?;
    let fresh = payloads_for(&schedules);

    let qp = home.queue_path()?;
    let queued = read_queue(&qp)?;
    let delivered = read_delivered(&home.delivered_path()?)?;

    let r = reconcile(fresh, queued, &delivered);
    for p in &r.to_cancel {
        info!(identity = %p.identity, "cancelling stale notification");
    }
    write_queue(&qp, &r.next_queue())?;

    println!(
        "Planned {} new, cancelled {}, kept {} ({})",
        r.to_schedule.len(),
        r.to_cancel.len(),
        r.kept.len(),
        qp.display()
    );
    Ok(())
}

/// Remove queued payloads whose identity was already delivered. Returns the
/// remaining queue and how many were dropped.
pub fn drop_delivered(
    queue: Vec<NotificationPayload>,
    delivered: &HashSet<String>,
) -> (Vec<NotificationPayload>, usize) {
    let before = queue.len();
    let queue: Vec<NotificationPayload> =
        queue.into_iter().filter(|p| !delivered.contains(&p.identity)).collect();
    let dropped = before - queue.len();
    (queue, dropped)
}

/// Split the queue into payloads to deliver now and the rest.
pub fn take_due(
    queue: Vec<NotificationPayload>,
    cutoff: DateTime<Utc>,
    limit: usize,
) -> (Vec<NotificationPayload>, Vec<NotificationPayload>) {
    let mut due = Vec::new();
    let mut rest = Vec::new();
    for p in queue {
        if due.len() < limit && p.is_due(cutoff) {
            due.push(p);
        } else {
            rest.push(p);
        }
    }
    (due, rest)
}

fn dispatch<C: Clock>(
    home: &Home,
    cfg: &Config,
    engine: &NotificationEngine<C>,
    dry_run: bool,
    limit: Option<usize>,
    include_future_minutes: Option<i64>,
) -> Result<()> {
    let limit = limit.unwrap_or(cfg.dispatch.max_per_run);
    let future_min = include_future_minutes.unwrap_or(cfg.dispatch.include_future_minutes);

    let qp = home.queue_path()?;
    let dp = home.delivered_path()?;
    let delivered = read_delivered(&dp)?;
    let (queue, already_sent) = drop_delivered(read_queue(&qp)?, &delivered);
    if already_sent > 0 {
        warn!(already_sent, "dropping queued notifications that were already delivered");
    }
    if queue.is_empty() {
        if already_sent > 0 && !dry_run {
            write_queue(&qp, &queue)?;
        }
        println!("No queued notifications. Run: nudge plan");
        return Ok(());
    }

    let now = engine.now();
    let cutoff = now + Duration::minutes(future_min.max(0));
    let (due, rest) = take_due(queue, cutoff, limit);

    if due.is_empty() {
        if already_sent > 0 && !dry_run {
            write_queue(&qp, &rest)?;
        }
        println!("No due notifications.");
        return Ok(());
    }

    if dry_run {
        for p in &due {
            println!("[DRY RUN] would send [{}] {} at {}", p.kind, p.title, p.fire_at.to_rfc3339());
        }
        return Ok(());
    }

    let today = now.with_timezone(&engine.profile().timezone).date_naive();
    let lp = home.overdue_counts_path()?;
    let mut ledger = OverdueLedger::load(&lp)?;
    let mut identities = Vec::with_capacity(due.len());

    for p in &due {
        if p.kind == NotificationType::Overdue {
            ledger.record(&p.task_id, today);
        }
        identities.push(p.identity.clone());
    }

    // Persisted before anything is emitted; a send is never repeated.
    append_delivered(&dp, &identities)?;
    ledger.save(&lp)?;
    write_queue(&qp, &rest)?;

    for p in &due {
        println!("{}", serde_json::to_string(p)?);
    }
    info!(sent = identities.len(), remaining = rest.len(), "dispatch complete");
    Ok(())
}

fn summary<C: Clock>(home: &Home, engine: &NotificationEngine<C>, json: bool) -> Result<()> {
    let schedules = compute_schedules(home, engine)?;
    let s = get_notification_summary(&schedules);

    if json {
        println!("{}", serde_json::to_string_pretty(&s)?);
        return Ok(());
    }

    println!("Notifications: {} across {} tasks", s.total, schedules.len());
    println!("\nBy priority:");
    for (p, n) in &s.by_priority {
        println!("- {p}: {n}");
    }
    println!("\nBy type:");
    for (t, n) in &s.by_type {
        println!("- {t}: {n}");
    }
    Ok(())
}

fn status(home: &Home, now: DateTime<Utc>) -> Result<()> {
    let queue = read_queue(&home.queue_path()?)?;
    let delivered = read_delivered(&home.delivered_path()?)?;

    let due = queue.iter().filter(|p| p.is_due(now)).count();
    println!(
        "Queue: {} pending, {} due, {} future, {} delivered",
        queue.len(),
        due,
        queue.len() - due,
        delivered.len()
    );
    Ok(())
}

fn config_check(home: &Home) -> Result<()> {
    let cfg = load_config(home)?;

    println!("Profile:\n");
    println!("- work_hours_start: {}", cfg.profile.work_hours_start);
    println!("- work_hours_end: {}", cfg.profile.work_hours_end);
    println!("- peak_energy_time: {}", cfg.profile.peak_energy_time);
    println!("- timezone: {}", cfg.profile.timezone);
    println!("\nDispatch:\n");
    println!("- max_per_run: {}", cfg.dispatch.max_per_run);
    println!("- include_future_minutes: {}", cfg.dispatch.include_future_minutes);

    if let Err(e) = cfg.user_profile() {
        bail!("{e:#}");
    }
    println!("\nProfile OK.");
    Ok(())
}
