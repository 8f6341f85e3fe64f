//! Plain text output for the terminal.

use anyhow::Result;
use serde::Serialize;
use vetclaim_core::calculator::{
    CombinedRating, CompensationBreakdown, MergedPresumptive, PresumptiveMatch,
};
use vetclaim_core::models::{
    ActionSteps, Appointment, ClaimItem, ClaimType, Disability, ExtractedClaimData,
    ExtractionOutcome, IncreaseStrategy, NewClaimSuggestions, RatingCriterion, SavedDocument,
    SecondaryDetails, SymptomLog, Todo, UserProfile,
};
use vetclaim_core::store::StoredProfile;
use vetclaim_core::utils::{format_date, format_usd, truncate_string};
use vetclaim_core::{Assessment, Money};

/// Width of the name column in tables
const NAME_WIDTH: usize = 40;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn combined(rating: &CombinedRating) {
    println!("Combined rating: {}% (exact {:.2}%)", rating.rounded, rating.raw);
}

fn line_item(label: &str, amount: Money) {
    if !amount.is_zero() {
        println!("  {:<32} {:>12}", label, format_usd(amount));
    }
}

pub fn compensation(breakdown: &CompensationBreakdown) {
    match breakdown.key {
        Some(key) => println!("Rating {}% ({})", breakdown.rating, key.as_str()),
        None => println!("Rating {}%", breakdown.rating),
    }
    line_item("Base rate", breakdown.base);
    line_item("Additional children under 18", breakdown.additional_children);
    line_item("Children over 18 in school", breakdown.school_children);
    line_item("Additional dependent parents", breakdown.additional_parents);
    line_item("SMC-K", breakdown.smc_k);
    line_item("Spouse aid and attendance", breakdown.spouse_aid_attendance);
    println!("  {:<32} {:>12}", "Monthly total", format_usd(breakdown.total));
}

pub fn presumptive_matches(matches: &[PresumptiveMatch]) {
    if matches.is_empty() {
        println!("No presumptive categories overlap this service period.");
        return;
    }
    let mut label = "";
    for m in matches {
        if m.category_label != label {
            label = &m.category_label;
            println!("{}", label);
        }
        println!("  - {}", m.condition);
    }
}

pub fn merged_presumptives(merged: &[MergedPresumptive]) {
    if merged.is_empty() {
        println!("No presumptive categories overlap this service period.");
        return;
    }
    for m in merged {
        println!("{} ({})", m.condition, m.legal_bases.join(", "));
    }
}

pub fn assessment(profile: &UserProfile, a: &Assessment) {
    println!("{}", profile.display_name());
    println!("  Combined rating:   {}% (exact {:.2}%)", a.rounded_combined, a.raw_combined);
    println!("  Monthly payment:   {}", format_usd(a.compensation));
    let presumptive = if a.presumptive_eligible {
        "eligible"
    } else if profile.service_dates.is_complete() {
        "not eligible"
    } else {
        "enter service dates to check"
    };
    println!("  Presumptive:       {}", presumptive);
    if a.presumptive_prompt_due {
        println!();
        println!("Your service dates overlap a presumptive exposure window.");
        println!("Run `vetclaim suggest --questions` to see the screening questions.");
    }
}

pub fn profile(stored: &StoredProfile) {
    let p = &stored.profile;
    println!("{} ({})", p.display_name(), p.id);
    if !p.email.is_empty() {
        println!("  Email:        {}", p.email);
    }
    println!("  Membership:   {}", p.membership_status);
    let dates = &p.service_dates;
    if dates.is_complete() {
        println!(
            "  Service:      {} to {}",
            format_date(&dates.eod),
            format_date(&dates.rad)
        );
    }
    println!(
        "  Dependents:   {}, {} total",
        p.dependents.marital_status,
        p.dependents.total_dependents()
    );
    println!("  Disabilities: {}", p.disabilities.len());
    println!("  Claims:       {}", p.claim_package.len());
    println!("  Saved:        {}", stored.age_display());
}

pub fn disabilities(list: &[Disability]) {
    if list.is_empty() {
        println!("No disabilities entered.");
        return;
    }
    for d in list {
        println!(
            "{:>15}  {:<width$} {:>4}%",
            d.id,
            truncate_string(&d.name, NAME_WIDTH),
            d.rating,
            width = NAME_WIDTH
        );
    }
}

fn claim_detail(item: &ClaimItem) -> String {
    match item.claim_type {
        ClaimType::Secondary => match (&item.primary, &item.chance) {
            (Some(primary), Some(chance)) => format!("secondary to {}, {} chance", primary, chance),
            (Some(primary), None) => format!("secondary to {}", primary),
            _ => "secondary".to_string(),
        },
        ClaimType::Presumptive => match &item.act {
            Some(act) => format!("presumptive, {}", act),
            None => "presumptive".to_string(),
        },
        ClaimType::Primary => "primary".to_string(),
    }
}

pub fn claims(package: &[ClaimItem]) {
    if package.is_empty() {
        println!("The claim package is empty.");
        return;
    }
    for item in package {
        let rating = if item.approved_rating > 0 {
            format!(" {}%", item.approved_rating)
        } else {
            String::new()
        };
        println!(
            "{:<width$} {:<20}{}",
            truncate_string(&item.name, NAME_WIDTH),
            item.status.label(),
            rating,
            width = NAME_WIDTH
        );
        println!("    {}", claim_detail(item));
        if !item.notes.is_empty() {
            let notes = &item.notes;
            for (label, text) in [
                ("In-service event", &notes.in_service_event),
                ("Symptoms", &notes.symptoms),
                ("Work impact", &notes.work_impact),
                ("Personal impact", &notes.personal_impact),
            ] {
                if !text.is_empty() {
                    println!("    {}: {}", label, truncate_string(text, 60));
                }
            }
        }
    }
}

pub fn symptom_logs(condition: &str, logs: &[SymptomLog], tip: &str) {
    println!("{}", condition);
    if logs.is_empty() {
        println!("  No entries yet.");
    }
    for log in logs {
        println!(
            "  {:>15}  {}  severity {}/10  {}",
            log.id,
            format_date(&log.date),
            log.severity,
            truncate_string(&log.notes, 50)
        );
    }
    println!();
    println!("Tip: {}", tip);
}

pub fn appointments(list: &[&Appointment]) {
    if list.is_empty() {
        println!("No appointments.");
        return;
    }
    for a in list {
        let (date, time) = a.when();
        let at = if time.is_empty() {
            format_date(date)
        } else {
            format!("{} {}", format_date(date), time)
        };
        println!("{:>15}  {:<20} {}", a.id, at, a.title);
        if !a.location.is_empty() {
            println!("{:>17}{}", "", a.location);
        }
    }
}

pub fn todos(list: &[Todo]) {
    if list.is_empty() {
        println!("Nothing to do.");
        return;
    }
    for t in list {
        let mark = if t.completed { "x" } else { " " };
        let due = t
            .due_date
            .as_deref()
            .map(|d| format!(" (due {})", format_date(d)))
            .unwrap_or_default();
        println!("{:>15}  [{}] {}{}", t.id, mark, t.text, due);
    }
}

pub fn questions(list: &[(&str, &str)], answered: impl Fn(&str) -> Option<bool>) {
    for (id, question) in list {
        let answer = match answered(*id) {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        println!("{:<24} [{}] {}", id, answer, question);
    }
}

pub fn suggestions(s: &NewClaimSuggestions) {
    if s.is_empty() {
        println!("No new claims to suggest.");
        return;
    }
    if !s.presumptive_conditions.is_empty() {
        println!("Presumptive conditions");
        for p in &s.presumptive_conditions {
            println!("  - {} ({})", p.name, p.act);
            if let Some(symptom) = &p.user_symptom {
                println!("      because: {}", symptom);
            }
        }
    }
    for group in &s.secondary_conditions {
        println!("Secondary to {}", group.primary_condition_name);
        for c in &group.suggested_secondaries {
            println!("  - {:<44} {}", c.name, c.chance);
        }
    }
}

fn action_steps(steps: &ActionSteps) {
    for (label, text) in [
        ("Evidence", &steps.crucial_evidence),
        ("Documentation", &steps.documentation),
        ("Statements", &steps.statements),
    ] {
        if let Some(text) = text {
            println!("    {}: {}", label, text);
        }
    }
}

pub fn increases(list: &[IncreaseStrategy]) {
    if list.is_empty() {
        println!("No increase strategies returned.");
        return;
    }
    for s in list {
        if s.is_at_maximum() {
            println!("{} ({}): at the maximum rating", s.name, s.current_rating);
            continue;
        }
        println!("{}: {} -> {}", s.name, s.current_rating, s.next_rating);
        if let Some(criteria) = &s.criteria_for_next_rating {
            println!("    Criteria: {}", criteria);
        }
        if let Some(how) = &s.how_to_increase {
            println!("    How: {}", how);
        }
        if let Some(steps) = &s.action_steps {
            action_steps(steps);
        }
    }
}

pub fn criteria(condition: &str, levels: &[RatingCriterion]) {
    println!("{}", condition);
    for level in levels {
        println!("  {}", level.rating);
        if let Some(criteria) = &level.criteria {
            println!("    Criteria: {}", criteria);
        }
        if let Some(how) = &level.how_to_increase {
            println!("    How: {}", how);
        }
        if let Some(steps) = &level.action_steps {
            action_steps(steps);
        }
    }
}

pub fn secondary_details(primary: &str, secondary: &str, details: &SecondaryDetails) {
    println!("{} secondary to {}", secondary, primary);
    if let Some(what) = &details.what_it_is {
        println!();
        println!("{}", what);
    }
    if let Some(connection) = &details.how_its_connected {
        println!();
        println!("Connection: {}", connection);
    }
    if !details.what_to_do.is_empty() {
        println!();
        println!("What to do");
        for (i, step) in details.what_to_do.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
    if let Some(how) = &details.how_to_file {
        println!();
        println!("Filing: {}", how);
    }
}

pub fn extraction(data: &ExtractedClaimData, outcome: Option<&ExtractionOutcome>) {
    for d in &data.disabilities {
        println!("  {:<width$} {:>4}%", d.name, d.rating, width = NAME_WIDTH);
    }
    match data.service_dates() {
        Some(dates) => println!("  Service: {} to {}", dates.eod, dates.rad),
        None => println!("  Service dates not found"),
    }
    if let Some(outcome) = outcome {
        if outcome.changed() {
            println!(
                "Added {} disabilities{}",
                outcome.added.len(),
                if outcome.dates_set { " and set service dates" } else { "" }
            );
        } else {
            println!("Nothing new to add.");
        }
    }
}

pub fn documents(list: &[&SavedDocument]) {
    if list.is_empty() {
        println!("No saved documents.");
        return;
    }
    for d in list {
        let created = d
            .created_at
            .map(|t| t.format("%b %d, %Y").to_string())
            .unwrap_or_default();
        println!(
            "{:>15}  {:<30} {:<width$} {}",
            d.id,
            truncate_string(&d.display_title(), 30),
            truncate_string(&d.condition_name, NAME_WIDTH),
            created,
            width = NAME_WIDTH
        );
    }
}
