use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use uuid::Uuid;

const DURATION_SECS: u64 = 10;
const RACE_ACTIVITY: &str = "Math Club";

fn base_url() -> String {
    std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

#[tokio::main]
async fn main() {
    let base = base_url();
    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    if client.get(format!("{}/health", base)).send().await.is_err() {
        eprintln!("{}", "❌ Server is NOT reachable. Please start it first.".red().bold());
        return;
    }

    println!("\n{}", "=".repeat(60));
    println!("Benchmarking Endpoint: {}", "List Activities (Public Read)".cyan().bold());
    println!("{}", "=".repeat(60));
    println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
    println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

    let list_url = format!("{}/activities", base);
    for rps in [10, 50, 200, 1000] {
        run_stage(&client, &list_url, rps).await;
    }

    println!("\n{}", "=".repeat(60));
    println!("Capacity Race: {}", RACE_ACTIVITY.cyan().bold());
    println!("{}", "=".repeat(60));
    run_capacity_race(&client, &base).await;
}

async fn run_stage(client: &Client, url: &str, rps: u32) {
    let limiter = Arc::new(RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(rps).unwrap())
    ));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = url.to_string();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = client.get(&url).send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).unwrap();
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64).unwrap();
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
}

async fn fetch_roster(client: &Client, base: &str, activity: &str) -> (i64, usize) {
    let body: Value = client.get(format!("{}/activities", base))
        .send().await.expect("Failed to list activities")
        .json().await.expect("Failed to parse activities");
    let entry = &body[activity];
    let max = entry["max_participants"].as_i64().unwrap_or(0);
    let count = entry["participants"].as_array().map(|p| p.len()).unwrap_or(0);
    (max, count)
}

/// Fires more concurrent signups than there are free slots and checks that
/// the activity never ends up over capacity. Removes its own signups afterwards.
async fn run_capacity_race(client: &Client, base: &str) {
    let (max, before) = fetch_roster(client, base, RACE_ACTIVITY).await;
    if max <= 0 {
        println!("{}", "Activity has no capacity limit, skipping race".yellow());
        return;
    }
    let free = (max as usize).saturating_sub(before);
    let contenders = free + 20;
    println!("Capacity {} / enrolled {} / contenders {}", max, before, contenders);

    let mut set = JoinSet::new();
    for _ in 0..contenders {
        let client = client.clone();
        let url = format!("{}/activities/{}/signup", base, RACE_ACTIVITY);
        let email = format!("bench-{}@mergington.edu", Uuid::new_v4());
        set.spawn(async move {
            let status = client.post(&url).query(&[("email", &email)]).send().await
                .map(|r| r.status())
                .ok();
            (email, status)
        });
    }

    let mut admitted = Vec::new();
    let mut rejected = 0;
    let mut failed = 0;
    while let Some(res) = set.join_next().await {
        match res {
            Ok((email, Some(StatusCode::OK))) => admitted.push(email),
            Ok((_, Some(StatusCode::BAD_REQUEST))) => rejected += 1,
            _ => failed += 1,
        }
    }

    let (_, after) = fetch_roster(client, base, RACE_ACTIVITY).await;
    println!("Admitted {} / rejected {} / errors {}", admitted.len(), rejected, failed);

    if after as i64 > max || admitted.len() > free {
        println!("{}", format!("❌ Capacity exceeded: {} enrolled, capacity {}", after, max).red().bold());
    } else {
        println!("{}", format!("✅ Capacity held: {} enrolled, capacity {}", after, max).green());
    }

    for email in admitted {
        let _ = client.delete(format!("{}/activities/{}/unregister", base, RACE_ACTIVITY))
            .query(&[("email", &email)])
            .send()
            .await;
    }
}
