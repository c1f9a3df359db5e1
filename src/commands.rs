use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use smartfood::analysis::upload::mime_from_ext;
use smartfood::analysis::{analyze_upload, AnalysisResult, Safety, UploadItem};
use smartfood::profile::dto::{label_for, ALLERGIES, CONDITIONS, DIETARY_PREFERENCES};
use smartfood::profile::{DietaryPreference, ProfileForm};
use smartfood::AppState;

use crate::cli::{HistoryCommands, ProfileCommands};

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn login(st: &mut AppState, email: &str, password: &str, json: bool) -> anyhow::Result<()> {
    let user = st.auth.login(email, password).await?;
    if json {
        return print_json(user);
    }
    println!("Signed in as {} <{}>", user.name, user.email);
    if !user.has_completed_profile {
        println!("Set up your health profile with `smartfood profile set --diet <diet>`.");
    }
    Ok(())
}

pub async fn register(
    st: &mut AppState,
    name: &str,
    email: &str,
    password: &str,
    json: bool,
) -> anyhow::Result<()> {
    let user = st.auth.register(name, email, password).await?;
    if json {
        return print_json(user);
    }
    println!("Welcome, {}! Your account is ready.", user.name);
    println!("Set up your health profile with `smartfood profile set --diet <diet>`.");
    Ok(())
}

pub async fn logout(st: &mut AppState) -> anyhow::Result<()> {
    st.auth.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub fn whoami(st: &AppState, json: bool) -> anyhow::Result<()> {
    match st.auth.user() {
        Some(user) if json => print_json(user),
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            println!(
                "health profile: {}",
                if user.has_completed_profile { "complete" } else { "not set up" }
            );
            Ok(())
        }
        None if json => print_json(&json!(null)),
        None => {
            println!("Not signed in.");
            Ok(())
        }
    }
}

pub async fn profile(st: &mut AppState, action: ProfileCommands, json: bool) -> anyhow::Result<()> {
    match action {
        ProfileCommands::Show => {
            let profile = st.profile.profile();
            if json {
                return print_json(profile);
            }
            if !st.profile.has_profile() {
                println!("No health profile yet.");
                return Ok(());
            }
            println!("Dietary preference: {}", label_for(DIETARY_PREFERENCES, profile.dietary_preference.as_str()));
            print_labels("Allergies", ALLERGIES, &profile.allergies);
            print_labels("Conditions", CONDITIONS, &profile.conditions);
            Ok(())
        }
        ProfileCommands::Set {
            diet,
            allergies,
            conditions,
        } => {
            let mut form = ProfileForm::default();
            for id in dedup(allergies) {
                form.toggle_allergy(&id);
            }
            for id in dedup(conditions) {
                form.toggle_condition(&id);
            }
            form.dietary_preference = match diet {
                Some(d) => d.parse()?,
                None => DietaryPreference::Unset,
            };
            let profile = form.submit()?;
            st.profile.update(profile).await?;
            st.auth.mark_profile_completed().await?;
            if json {
                return print_json(st.profile.profile());
            }
            println!("Health profile saved.");
            Ok(())
        }
        ProfileCommands::Options => {
            if json {
                return print_json(&json!({
                    "allergies": ALLERGIES,
                    "conditions": CONDITIONS,
                    "dietaryPreferences": DIETARY_PREFERENCES,
                }));
            }
            for (title, choices) in [
                ("Allergies", ALLERGIES),
                ("Conditions", CONDITIONS),
                ("Dietary preferences", DIETARY_PREFERENCES),
            ] {
                println!("{title}:");
                for c in choices {
                    println!("  {:<16} {}", c.id, c.label);
                }
            }
            Ok(())
        }
    }
}

fn dedup(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn print_labels(title: &str, choices: &[smartfood::profile::dto::Choice], ids: &[String]) {
    if ids.is_empty() {
        println!("{title}: none");
        return;
    }
    let labels: Vec<&str> = ids.iter().map(|id| label_for(choices, id)).collect();
    println!("{title}: {}", labels.join(", "));
}

pub async fn analyze(st: &mut AppState, path: &Path, json: bool) -> anyhow::Result<()> {
    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(mime_from_ext)
        .unwrap_or("application/octet-stream");

    if !json {
        println!("Analyzing {file_name}...");
    }
    let result = analyze_upload(
        st,
        UploadItem {
            file_name: &file_name,
            body: Bytes::from(body),
            content_type,
        },
    )
    .await?;

    if json {
        return print_json(&result);
    }
    print_analysis(&result);
    Ok(())
}

pub fn history(st: &AppState, action: Option<HistoryCommands>, json: bool) -> anyhow::Result<()> {
    match action.unwrap_or(HistoryCommands::List) {
        HistoryCommands::List => {
            let entries = st.analysis.history();
            if json {
                return print_json(entries);
            }
            if entries.is_empty() {
                println!("No analyses yet. Try `smartfood analyze <image>`.");
            }
            for a in entries {
                print_history_line(a);
            }
            Ok(())
        }
        HistoryCommands::Show { id } => {
            let result = st
                .analysis
                .find(&id)
                .with_context(|| format!("no analysis with id {id}"))?;
            if json {
                return print_json(result);
            }
            print_analysis(result);
            Ok(())
        }
    }
}

pub fn dashboard(st: &AppState, json: bool) -> anyhow::Result<()> {
    let summary = st.analysis.summary();
    let recent: Vec<&AnalysisResult> = st.analysis.history().iter().take(5).collect();
    if json {
        return print_json(&json!({
            "user": st.auth.user(),
            "summary": summary,
            "recent": recent,
        }));
    }
    match st.auth.user() {
        Some(user) => println!("Welcome back, {}!", user.name),
        None => println!("Welcome! Sign in to keep your analyses with your account."),
    }
    println!(
        "Analyses: {}   safe ingredients: {}   unsafe ingredients: {}",
        summary.total_analyses, summary.total_safe, summary.total_unsafe
    );
    if !recent.is_empty() {
        println!();
        println!("Recent:");
        for a in recent {
            print_history_line(a);
        }
    }
    Ok(())
}

fn print_history_line(a: &AnalysisResult) {
    let when = a.analyzed_at.format(&Rfc3339).unwrap_or_default();
    let unsafe_count = a.count(Safety::Unsafe);
    let flag = if unsafe_count > 0 {
        format!("  {unsafe_count} unsafe")
    } else {
        String::new()
    };
    println!(
        "{}  {}  {} safe{}  [{}]",
        when,
        a.food_name,
        a.count(Safety::Safe),
        flag,
        a.id
    );
}

fn print_analysis(a: &AnalysisResult) {
    println!("{} ({})", a.food_name, a.id);
    if !a.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &a.warnings {
            println!("  ! {w}");
        }
    }
    println!();
    println!("Ingredients:");
    for i in &a.ingredients {
        match &i.reason {
            Some(reason) => println!("  {:<24} {:<9} {}", i.name, i.safety.as_str(), reason),
            None => println!("  {:<24} {}", i.name, i.safety.as_str()),
        }
    }
    let n = &a.nutrition;
    println!();
    println!("Nutrition:");
    println!("  calories       {} kcal", n.calories);
    println!("  protein        {} g", n.protein);
    println!("  carbohydrates  {} g", n.carbohydrates);
    println!("  fat            {} g", n.fat);
    if let Some(fiber) = n.fiber {
        println!("  fiber          {fiber} g");
    }
    if let Some(sugar) = n.sugar {
        println!("  sugar          {sugar} g");
    }
    if let Some(sodium) = n.sodium {
        println!("  sodium         {sodium} mg");
    }
}
