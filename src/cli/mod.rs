use chrono::NaiveDate;
use clap::{Arg, Command};
use std::time::Duration;
use tracing::{error, info};

use crate::normalize::{format_price, merge_timeline, normalize_variant, TimelineItem};
use crate::poller::{GenerationPoller, PollOutcome};
use crate::types::{BudgetTier, GenerationOptions, TravelRequest};
use crate::{PlanClient, Session};

/// CLI entry point for the tripcraft tool
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("tripcraft")
        .version("0.1.0")
        .about("Plan a trip: submit a travel request, watch generation, print the itinerary")
        .arg(
            Arg::new("destination")
                .help("Destination city")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .value_name("YYYY-MM-DD")
                .help("First day of the trip")
                .required(true),
        )
        .arg(
            Arg::new("end")
                .long("end")
                .value_name("YYYY-MM-DD")
                .help("Last day of the trip (inclusive)")
                .required(true),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("CITY")
                .help("Departure city"),
        )
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("TIER")
                .help("Budget tier: economy, comfort, premium or luxury")
                .default_value("comfort"),
        )
        .arg(
            Arg::new("travelers")
                .short('n')
                .long("travelers")
                .value_name("COUNT")
                .help("Number of travelers")
                .default_value("1"),
        )
        .arg(
            Arg::new("interests")
                .short('i')
                .long("interests")
                .value_name("LIST")
                .help("Comma-separated interest tags"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Backend base URL (or set TRIPCRAFT_BASE_URL)"),
        )
        .arg(
            Arg::new("token")
                .short('k')
                .long("token")
                .value_name("TOKEN")
                .help("Bearer token (or set TRIPCRAFT_TOKEN)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Per-request timeout in seconds")
                .default_value("30"),
        )
        .get_matches();

    let mut session = match matches.get_one::<String>("base-url") {
        Some(base_url) => Session::new(base_url.clone()),
        None => Session::from_env()?,
    };
    if let Some(token) = matches.get_one::<String>("token") {
        session = session.with_token(token.clone());
    }

    let timeout_seconds: u64 = matches.get_one::<String>("timeout").unwrap().parse()?;
    let client = PlanClient::with_timeout(session, Duration::from_secs(timeout_seconds))?;

    let start: NaiveDate = matches.get_one::<String>("start").unwrap().parse()?;
    let end: NaiveDate = matches.get_one::<String>("end").unwrap().parse()?;
    let mut request = TravelRequest::new(
        matches.get_one::<String>("destination").unwrap().clone(),
        start,
        end,
    );
    request.departure = matches.get_one::<String>("from").cloned();
    request.budget = matches.get_one::<String>("budget").unwrap().parse::<BudgetTier>()?;
    request.travelers = matches.get_one::<String>("travelers").unwrap().parse()?;
    if let Some(interests) = matches.get_one::<String>("interests") {
        request.interests = interests
            .split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
    }

    info!("Creating plan for {}", request.destination);
    let plan_id = client.create_plan(&request).await?;
    client
        .start_generation(plan_id, &request, &GenerationOptions::default())
        .await?;

    let outcome = GenerationPoller::new(client.clone())
        .watch(plan_id, |update| {
            if let Some(preview) = &update.preview {
                println!(
                    "[{:>3.0}%] generating… {} hotels, {} attractions so far",
                    update.progress,
                    preview.hotels.len(),
                    preview.attractions.len()
                );
            } else {
                println!("[{:>3.0}%] waiting…", update.progress);
            }
        })
        .await?;

    match outcome {
        PollOutcome::Completed => {}
        PollOutcome::Failed => {
            error!("Generation failed for plan {plan_id}");
            return Err("generation failed".into());
        }
        PollOutcome::TimedOut => {
            println!("Generation is taking longer than expected; check your plan history later.");
            return Ok(());
        }
    }

    let detail = client.plan_detail(plan_id).await?;
    println!("\n{} (plan #{})", detail.plan.title, detail.plan.id);
    for raw in &detail.plan.generated_plans {
        let variant = normalize_variant(raw);
        println!(
            "\n== {} {} (总价 {})",
            variant.plan_type,
            variant.title,
            format_price(variant.costs.total)
        );
        for day in &variant.days {
            println!(
                "-- 第{}天 {} (预计 {})",
                day.day,
                day.date,
                format_price(day.estimated_cost)
            );
            for item in merge_timeline(day) {
                match item {
                    TimelineItem::Activity(entry) => {
                        println!("   {} {} {}", entry.time, entry.activity, entry.location)
                    }
                    TimelineItem::Meal(meal) => {
                        println!("   {} [{}] {}", meal.time, meal.meal_type, meal.name)
                    }
                }
            }
            for line in day.transportation.display_lines() {
                println!("   交通: {line}");
            }
        }
    }

    Ok(())
}
