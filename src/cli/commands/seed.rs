use anyhow::{bail, Context};
use clap::Args;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    #[arg(long, default_value = "http://localhost:8001", help = "Base URL of the running server")]
    pub url: String,

    #[arg(long, default_value = "admin", help = "Admin username")]
    pub username: String,

    #[arg(long, default_value = "admin123", help = "Admin password")]
    pub password: String,

    #[arg(long, help = "Only create the admin account")]
    pub skip_content: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    /// `false` when an admin already existed.
    pub admin_created: bool,
    pub sections: Vec<String>,
    pub skills: usize,
    pub projects: usize,
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let report = run(&args).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if report.admin_created {
                println!("Admin '{}' created. Change the password after first login.", args.username);
            } else {
                println!("Admin already exists, skipped setup");
            }
            if !args.skip_content {
                println!("Sections written: {}", report.sections.join(", "));
                println!("Skills added: {}", report.skills);
                println!("Projects added: {}", report.projects);
            }
        }
    }
    Ok(())
}

/// Create the admin (if absent), log in, and write the sample content.
pub async fn run(args: &SeedArgs) -> anyhow::Result<SeedReport> {
    let api = format!("{}/api", args.url.trim_end_matches('/'));
    let client = Client::new();
    let credentials = json!({ "username": args.username, "password": args.password });
    let mut report = SeedReport::default();

    let setup = client
        .post(format!("{}/admin/setup", api))
        .json(&credentials)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", args.url))?;
    match setup.status() {
        StatusCode::OK => report.admin_created = true,
        StatusCode::BAD_REQUEST => tracing::info!("Admin setup skipped: {}", detail(setup).await),
        status => bail!("admin setup failed with {}: {}", status, detail(setup).await),
    }

    if args.skip_content {
        return Ok(report);
    }

    let login = client
        .post(format!("{}/admin/login", api))
        .json(&credentials)
        .send()
        .await?;
    if login.status() != StatusCode::OK {
        bail!("could not log in as {}: {}", args.username, detail(login).await);
    }
    let body: Value = login.json().await?;
    let token = body["token"]
        .as_str()
        .context("login response carried no token")?
        .to_string();

    for (section, document) in sample_sections() {
        send(client.put(format!("{}/portfolio/{}", api, section)).json(&document), &token).await?;
        report.sections.push(section.to_string());
    }

    for skill in sample_skills() {
        send(client.post(format!("{}/portfolio/skills", api)).json(&skill), &token).await?;
        report.skills += 1;
    }

    for project in sample_projects() {
        send(client.post(format!("{}/portfolio/projects", api)).json(&project), &token).await?;
        report.projects += 1;
    }

    Ok(report)
}

async fn send(request: RequestBuilder, token: &str) -> anyhow::Result<()> {
    let response = request.bearer_auth(token).send().await?;
    if !response.status().is_success() {
        bail!("request failed with {}: {}", response.status(), detail(response).await);
    }
    Ok(())
}

/// Best-effort `detail` from an error body.
async fn detail(response: reqwest::Response) -> String {
    match response.json::<Value>().await {
        Ok(body) => body["detail"].as_str().unwrap_or("no detail").to_string(),
        Err(_) => "no detail".to_string(),
    }
}

fn sample_sections() -> Vec<(&'static str, Value)> {
    vec![
        (
            "hero",
            json!({
                "name": "Your Name",
                "title": "Full Stack Developer",
                "tagline": "I build web and mobile products end to end",
                "image_url": "https://via.placeholder.com/200",
                "resume_url": ""
            }),
        ),
        (
            "about",
            json!({
                "text_en": "Developer working across web, mobile and cloud infrastructure.",
                "text_bn": "ওয়েব, মোবাইল এবং ক্লাউড নিয়ে কাজ করা একজন ডেভেলপার।"
            }),
        ),
        (
            "contact",
            json!({
                "email": "you@example.com",
                "phone": "+880 1000000000",
                "location": "Dhaka, Bangladesh",
                "github": "https://github.com/yourusername",
                "linkedin": "https://linkedin.com/in/yourusername",
                "twitter": "https://twitter.com/yourusername"
            }),
        ),
    ]
}

fn sample_skills() -> Vec<Value> {
    [
        ("React", "Frontend"),
        ("TypeScript", "Frontend"),
        ("Rust", "Backend"),
        ("PostgreSQL", "Backend"),
        ("Flutter", "Mobile"),
        ("Docker", "DevOps"),
        ("AWS", "DevOps"),
    ]
    .iter()
    .enumerate()
    .map(|(order, (name, category))| json!({ "name": name, "category": category, "order": order }))
    .collect()
}

fn sample_projects() -> Vec<Value> {
    vec![
        json!({
            "title": "Online Store",
            "description_en": "Storefront with cart, checkout and payment integration",
            "description_bn": "কার্ট, চেকআউট এবং পেমেন্ট সহ অনলাইন দোকান",
            "tech_stack": ["React", "Rust", "PostgreSQL"],
            "image_url": "https://via.placeholder.com/400x300",
            "order": 0
        }),
        json!({
            "title": "Chat App",
            "description_en": "Real-time mobile messaging",
            "description_bn": "রিয়েল-টাইম মোবাইল মেসেজিং",
            "tech_stack": ["Flutter", "Firebase"],
            "image_url": "https://via.placeholder.com/400x300",
            "order": 1
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ContactInfo, HeroSection, Project, Skill};

    #[test]
    fn sample_content_matches_models() {
        for skill in sample_skills() {
            serde_json::from_value::<Skill>(skill).unwrap();
        }
        for project in sample_projects() {
            serde_json::from_value::<Project>(project).unwrap();
        }
        let sections = sample_sections();
        serde_json::from_value::<HeroSection>(sections[0].1.clone()).unwrap();
        serde_json::from_value::<ContactInfo>(sections[2].1.clone()).unwrap();
    }
}
