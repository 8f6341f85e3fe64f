//! Command handlers: load the profile, call into the core library, print.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context as _, Result};
use tracing::{debug, info};
use vetclaim_core::api::{BillingClient, GenerativeClient};
use vetclaim_core::auth::{CredentialStore, SecretKind};
use vetclaim_core::calculator::{
    compensation_breakdown, combined_rating, matching_categories, merge_by_condition, round_to_ten,
};
use vetclaim_core::error::{ProfileError, StrategyError};
use vetclaim_core::knowledge::{
    logging_tip, presumptive_categories, question_for, TemplateId, DOCUMENT_TEMPLATES,
    PRESUMPTIVE_SYMPTOM_QUESTIONS,
};
use vetclaim_core::membership::{
    available_templates, check_template_access, manual_upgrade, require_pro, SubscriptionEvent,
};
use vetclaim_core::models::{
    parse_iso_date, Appointment, ClaimItem, ClaimStatus, DependentProfile, NoteField, ServiceDates,
    SymptomLog, UserProfile,
};
use vetclaim_core::store::StoredProfile;
use vetclaim_core::strategy::{new_claim_suggestions, refresh_strategy};
use vetclaim_core::utils::file_stem_for;
use vetclaim_core::{assess, Config, ProfileStore, Secrets};

use crate::cli::{
    AppointmentAction, BillingAction, ClaimAction, Cli, Command, DisabilityAction, DocumentAction,
    MembershipAction, ProfileAction, SecretAction, SymptomAction, TodoAction,
};
use crate::render;

/// Read before prompting, so scripts can supply the passphrase.
const PASSPHRASE_ENV: &str = "VETCLAIM_PASSPHRASE";

/// The selected user's profile store.
struct Session {
    user_id: String,
    store: ProfileStore,
}

impl Session {
    fn load(&self) -> Result<StoredProfile> {
        self.store.load(&self.user_id)?.ok_or_else(|| {
            anyhow!(
                "No profile for user '{}'. Run `vetclaim profile init {}` first.",
                self.user_id,
                self.user_id
            )
        })
    }

    fn update<R>(&self, edit: impl FnOnce(&mut UserProfile) -> Result<R>) -> Result<R> {
        self.store.update(&self.user_id, edit)
    }
}

struct App {
    config: Config,
    user: Option<String>,
    json: bool,
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut app = App {
        config,
        user: cli.user,
        json: cli.json,
    };
    app.dispatch(cli.command).await
}

fn passphrase() -> Result<String> {
    if let Ok(value) = std::env::var(PASSPHRASE_ENV) {
        if !value.is_empty() {
            return Ok(value);
        }
    }
    rpassword::prompt_password("Profile passphrase: ").context("Failed to read passphrase")
}

fn parse_date_arg(label: &str, value: &str) -> Result<chrono::NaiveDate> {
    parse_iso_date(value)
        .ok_or_else(|| anyhow!("Invalid {} '{}', expected YYYY-MM-DD", label, value))
}

fn parse_secret_kind(kind: &str) -> Result<SecretKind> {
    SecretKind::parse(kind).ok_or_else(|| {
        let known: Vec<&str> = SecretKind::ALL.iter().map(|k| k.account()).collect();
        anyhow!("Unknown key '{}'. Expected one of: {}", kind, known.join(", "))
    })
}

fn parse_template(id: &str) -> Result<TemplateId> {
    TemplateId::parse(id).ok_or_else(|| {
        let known: Vec<&str> = DOCUMENT_TEMPLATES.iter().map(|t| t.id.as_str()).collect();
        anyhow!("Unknown template '{}'. Expected one of: {}", id, known.join(", "))
    })
}

impl App {
    fn plain_store(&self) -> Result<ProfileStore> {
        ProfileStore::new(&self.config.data_dir()?)
    }

    fn user_id(&self) -> Result<String> {
        self.user
            .clone()
            .or_else(|| self.config.last_user.clone())
            .ok_or_else(|| {
                anyhow!("No profile selected. Pass --user or run `vetclaim profile init <user_id>`.")
            })
    }

    fn session_for(&self, user_id: String) -> Result<Session> {
        let mut store = self.plain_store()?;
        if self.config.seal_profiles || store.is_sealed(&user_id) {
            store = store.with_passphrase(passphrase()?);
        }
        Ok(Session { user_id, store })
    }

    fn session(&self) -> Result<Session> {
        self.session_for(self.user_id()?)
    }

    fn gemini(&self) -> Result<GenerativeClient> {
        let key = Secrets::resolve().gemini_api_key.unwrap_or_default();
        Ok(GenerativeClient::new(key)?.with_model(self.config.gemini_model()))
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Rating { ratings } => {
                let combined = combined_rating(ratings);
                if self.json {
                    return render::print_json(&combined);
                }
                render::combined(&combined);
            }

            Command::Compensation { rating, dependents } => {
                let rounded = round_to_ten(f64::from(rating));
                let breakdown = compensation_breakdown(rounded, &dependents.into());
                if self.json {
                    return render::print_json(&breakdown);
                }
                render::compensation(&breakdown);
            }

            Command::Presumptive { eod, rad, merge } => {
                let entry = parse_date_arg("entry on duty date", &eod)?;
                let release = parse_date_arg("release date", &rad)?;
                if release <= entry {
                    bail!("Release date must be after the entry on duty date");
                }
                let matches = matching_categories(entry, release, presumptive_categories());
                if merge {
                    let merged = merge_by_condition(&matches);
                    if self.json {
                        return render::print_json(&merged);
                    }
                    render::merged_presumptives(&merged);
                } else {
                    if self.json {
                        return render::print_json(&matches);
                    }
                    render::presumptive_matches(&matches);
                }
            }

            Command::Assess => {
                let profile = self.session()?.load()?.profile;
                let assessment = assess(&profile);
                if self.json {
                    return render::print_json(&assessment);
                }
                render::assessment(&profile, &assessment);
            }

            Command::Profile { action } => self.profile(action)?,
            Command::Disability { action } => self.disability(action)?,

            Command::Dependents(args) => {
                let dependents = DependentProfile::from(args);
                self.session()?.update(|p| {
                    p.set_dependents(dependents);
                    Ok(())
                })?;
                println!("Dependents updated.");
            }

            Command::ServiceDates { eod, rad } => {
                let entry = parse_date_arg("entry on duty date", &eod)?;
                let release = parse_date_arg("release date", &rad)?;
                if release <= entry {
                    bail!("Release date must be after the entry on duty date");
                }
                let dates = ServiceDates::new(eod, rad);
                let due = self.session()?.update(|p| {
                    p.set_service_dates(dates);
                    Ok(assess(p).presumptive_prompt_due)
                })?;
                println!("Service dates updated.");
                if due {
                    println!("Your service overlaps a presumptive exposure window. Run `vetclaim suggest --questions`.");
                }
            }

            Command::Claim { action } => self.claim(action)?,
            Command::Symptom { action } => self.symptom(action)?,
            Command::Appointment { action } => self.appointment(action)?,
            Command::Todo { action } => self.todo(action)?,

            Command::Suggest { yes, no, questions } => self.suggest(yes, no, questions)?,
            Command::Analyze => self.analyze().await?,

            Command::Criteria { condition } => {
                let levels = self.gemini()?.rating_criteria(&condition).await?;
                if self.json {
                    return render::print_json(&levels);
                }
                render::criteria(&condition, &levels);
            }

            Command::Secondary { primary, secondary } => {
                let details = self.gemini()?.secondary_details(&primary, &secondary).await?;
                if self.json {
                    return render::print_json(&details);
                }
                render::secondary_details(&primary, &secondary, &details);
            }

            Command::Extract { file, dry_run } => self.extract(file, dry_run).await?,

            Command::Draft {
                condition,
                template,
                no_save,
            } => self.draft(&condition, &template, no_save).await?,

            Command::Document { action } => self.document(action)?,

            Command::Billing {
                action: BillingAction::Portal { return_url },
            } => {
                let profile = self.session()?.load()?.profile;
                let secret = Secrets::resolve().stripe_secret_key.unwrap_or_default();
                let client = BillingClient::new(secret)?
                    .with_default_return_url(self.config.billing_return_url());
                let customer = profile.stripe_customer_id.as_deref().unwrap_or_default();
                let portal = client
                    .create_portal_session(customer, return_url.as_deref())
                    .await?;
                if self.json {
                    return render::print_json(&portal);
                }
                println!("{}", portal.url);
            }

            Command::Membership { action } => self.membership(action)?,
            Command::Secret { action } => self.secret(action)?,
        }
        Ok(())
    }

    fn profile(&mut self, action: ProfileAction) -> Result<()> {
        match action {
            ProfileAction::Show => {
                let stored = self.session()?.load()?;
                if self.json {
                    return render::print_json(&stored.profile);
                }
                render::profile(&stored);
            }
            ProfileAction::Init {
                user_id,
                username,
                email,
            } => {
                let session = self.session_for(user_id.clone())?;
                if session.store.exists(&user_id) {
                    bail!("Profile '{}' already exists", user_id);
                }
                let profile = session
                    .store
                    .load_or_create(&user_id, || UserProfile::new(&user_id, username, email))?;
                self.config.last_user = Some(profile.id.clone());
                self.config.save()?;
                info!(user_id = %profile.id, sealed = session.store.is_sealing(), "Created profile");
                println!("Created profile '{}'.", profile.id);
            }
            ProfileAction::Edit {
                full_name,
                date_of_birth,
                phone,
                address,
                stripe_customer,
            } => {
                self.session()?.update(|p| {
                    if full_name.is_some() {
                        p.full_name = full_name;
                    }
                    if date_of_birth.is_some() {
                        p.date_of_birth = date_of_birth;
                    }
                    if phone.is_some() {
                        p.phone_number = phone;
                    }
                    if address.is_some() {
                        p.address = address;
                    }
                    if stripe_customer.is_some() {
                        p.stripe_customer_id = stripe_customer;
                    }
                    Ok(())
                })?;
                println!("Profile updated.");
            }
            ProfileAction::Reset => {
                self.session()?.update(|p| {
                    p.reset_claim_data();
                    Ok(())
                })?;
                println!("Claim data cleared.");
            }
            ProfileAction::Delete { yes } => {
                let user_id = self.user_id()?;
                if !yes {
                    bail!("Deleting '{}' cannot be undone. Re-run with --yes.", user_id);
                }
                if !self.plain_store()?.delete(&user_id)? {
                    bail!("No profile for user '{}'", user_id);
                }
                if self.config.last_user.as_deref() == Some(user_id.as_str()) {
                    self.config.last_user = None;
                    self.config.save()?;
                }
                println!("Deleted profile '{}'.", user_id);
            }
            ProfileAction::List => {
                let users = self.plain_store()?.list_users()?;
                if self.json {
                    return render::print_json(&users);
                }
                let current = self.user.clone().or_else(|| self.config.last_user.clone());
                for user in users {
                    let mark = if current.as_deref() == Some(user.as_str()) { "*" } else { " " };
                    println!("{} {}", mark, user);
                }
            }
        }
        Ok(())
    }

    fn disability(&self, action: DisabilityAction) -> Result<()> {
        let session = self.session()?;
        match action {
            DisabilityAction::Add { name, rating } => {
                let id = session.update(|p| Ok(p.add_disability(&name, rating)?))?;
                println!("Added {} ({}).", name, id);
            }
            DisabilityAction::Remove { id } => {
                let removed = session.update(|p| Ok(p.remove_disability(id)?))?;
                println!("Removed {}.", removed.name);
            }
            DisabilityAction::Rate { id, rating } => {
                session.update(|p| Ok(p.rate_disability(id, rating)?))?;
                println!("Rating updated.");
            }
            DisabilityAction::Rename { id, name } => {
                session.update(|p| Ok(p.rename_disability(id, &name)?))?;
                println!("Renamed to {}.", name);
            }
            DisabilityAction::List => {
                let profile = session.load()?.profile;
                if self.json {
                    return render::print_json(&profile.disabilities);
                }
                render::disabilities(&profile.disabilities);
            }
        }
        Ok(())
    }

    fn claim(&self, action: ClaimAction) -> Result<()> {
        let session = self.session()?;
        match action {
            ClaimAction::Add {
                name,
                secondary_of,
                act,
                chance,
            } => {
                let item = match (secondary_of, act) {
                    (Some(primary), _) => ClaimItem::secondary(&name, primary, chance),
                    (None, Some(act)) => ClaimItem::presumptive(&name, act),
                    (None, None) => ClaimItem::primary(&name),
                };
                if session.update(|p| Ok(p.add_claim(item)?))? {
                    println!("Added {} to the claim package.", name);
                } else {
                    println!("{} is already in the claim package.", name);
                }
            }
            ClaimAction::Remove { name } => {
                let removed = session.update(|p| Ok(p.remove_claim(&name)?))?;
                println!("Removed {}.", removed.name);
            }
            ClaimAction::Status {
                name,
                status,
                rating,
            } => {
                let status = ClaimStatus::parse(&status).ok_or_else(|| {
                    let labels: Vec<&str> = ClaimStatus::ALL.iter().map(|s| s.label()).collect();
                    anyhow!("Unknown status '{}'. Expected one of: {}", status, labels.join(", "))
                })?;
                session.update(|p| {
                    p.set_claim_status(&name, status)?;
                    if let Some(rating) = rating {
                        p.set_approved_rating(&name, rating)?;
                    }
                    Ok(())
                })?;
                println!("{} is now {}.", name, status);
            }
            ClaimAction::Note { name, field, text } => {
                let field = NoteField::parse(&field).ok_or_else(|| {
                    anyhow!(
                        "Unknown note field '{}'. Expected inServiceEvent, symptoms, workImpact or personalImpact",
                        field
                    )
                })?;
                session.update(|p| Ok(p.set_claim_note(&name, field, &text)?))?;
                println!("Note saved.");
            }
            ClaimAction::List => {
                let profile = session.load()?.profile;
                if self.json {
                    return render::print_json(&profile.claim_package);
                }
                render::claims(&profile.claim_package);
            }
        }
        Ok(())
    }

    fn symptom(&self, action: SymptomAction) -> Result<()> {
        let session = self.session()?;
        match action {
            SymptomAction::Log {
                condition,
                date,
                severity,
                duration,
                impact,
                notes,
            } => {
                parse_date_arg("date", &date)?;
                let mut log = SymptomLog::new(date, severity);
                log.duration = duration;
                log.impact = impact;
                log.notes = notes;
                let id = session.update(|p| Ok(p.add_symptom_log(&condition, log)?))?;
                println!("Logged entry {} for {}.", id, condition);
            }
            SymptomAction::Remove { condition, id } => {
                session.update(|p| Ok(p.remove_symptom_log(&condition, id)?))?;
                println!("Removed entry {}.", id);
            }
            SymptomAction::List { condition } => {
                let profile = session.load()?.profile;
                let logs = profile.symptom_logs_for(&condition);
                if self.json {
                    return render::print_json(logs);
                }
                render::symptom_logs(&condition, logs, logging_tip(&condition));
            }
            SymptomAction::Export { condition, output } => {
                let profile = session.load()?.profile;
                let path = output.unwrap_or_else(|| {
                    PathBuf::from(format!("{}_symptom_log.csv", file_stem_for(&condition)))
                });
                std::fs::write(&path, profile.symptom_csv(&condition))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "Wrote {} entries to {}.",
                    profile.symptom_logs_for(&condition).len(),
                    path.display()
                );
            }
        }
        Ok(())
    }

    fn appointment(&self, action: AppointmentAction) -> Result<()> {
        let session = self.session()?;
        match action {
            AppointmentAction::Add {
                title,
                date,
                time,
                location,
                condition,
                notes,
            } => {
                parse_date_arg("date", &date)?;
                let appointment = Appointment {
                    title,
                    date,
                    time,
                    location,
                    condition,
                    notes,
                    ..Default::default()
                };
                let id = session.update(|p| Ok(p.add_appointment(appointment)))?;
                println!("Added appointment {}.", id);
            }
            AppointmentAction::Edit {
                id,
                title,
                date,
                time,
                location,
                condition,
                notes,
            } => {
                if let Some(date) = &date {
                    parse_date_arg("date", date)?;
                }
                session.update(|p| {
                    let mut appointment = p
                        .appointments
                        .iter()
                        .find(|a| a.id == id)
                        .cloned()
                        .ok_or(ProfileError::AppointmentNotFound(id))?;
                    let fields = [
                        (&mut appointment.title, title),
                        (&mut appointment.date, date),
                        (&mut appointment.time, time),
                        (&mut appointment.location, location),
                        (&mut appointment.condition, condition),
                        (&mut appointment.notes, notes),
                    ];
                    for (slot, value) in fields {
                        if let Some(value) = value {
                            *slot = value;
                        }
                    }
                    Ok(p.update_appointment(appointment)?)
                })?;
                println!("Appointment updated.");
            }
            AppointmentAction::Remove { id } => {
                let removed = session.update(|p| Ok(p.remove_appointment(id)?))?;
                println!("Removed {}.", removed.title);
            }
            AppointmentAction::List => {
                let profile = session.load()?.profile;
                let upcoming = profile.upcoming_appointments();
                if self.json {
                    return render::print_json(&upcoming);
                }
                render::appointments(&upcoming);
            }
        }
        Ok(())
    }

    fn todo(&self, action: TodoAction) -> Result<()> {
        let session = self.session()?;
        match action {
            TodoAction::Add { text, due } => {
                if let Some(due) = &due {
                    parse_date_arg("due date", due)?;
                }
                let id = session.update(|p| Ok(p.add_todo(&text, due)?))?;
                println!("Added to-do {}.", id);
            }
            TodoAction::Done { id } => {
                let completed = session.update(|p| Ok(p.toggle_todo(id)?))?;
                println!("{}", if completed { "Marked done." } else { "Marked not done." });
            }
            TodoAction::Remove { id } => {
                let removed = session.update(|p| Ok(p.remove_todo(id)?))?;
                println!("Removed {}.", removed.text);
            }
            TodoAction::List => {
                let profile = session.load()?.profile;
                if self.json {
                    return render::print_json(&profile.todos);
                }
                render::todos(&profile.todos);
            }
        }
        Ok(())
    }

    fn suggest(&self, yes: Vec<String>, no: Vec<String>, questions: bool) -> Result<()> {
        let session = self.session()?;

        if questions {
            let profile = session.load()?.profile;
            render::questions(PRESUMPTIVE_SYMPTOM_QUESTIONS, |id| {
                profile.presumptive_symptoms.get(id).copied()
            });
            return Ok(());
        }

        for id in yes.iter().chain(no.iter()) {
            if question_for(id).is_none() {
                bail!("Unknown symptom '{}'. Run `vetclaim suggest --questions` for the list.", id);
            }
        }

        let suggestions = session.update(|p| {
            for id in &yes {
                p.set_presumptive_answer(&id.to_lowercase(), true);
            }
            for id in &no {
                p.set_presumptive_answer(&id.to_lowercase(), false);
            }
            let suggestions = new_claim_suggestions(p)?;
            p.mark_presumptive_prompt_shown();
            p.strategy_data.potential_new_claims = suggestions.clone();
            Ok(suggestions)
        })?;

        if self.json {
            return render::print_json(&suggestions);
        }
        render::suggestions(&suggestions);
        Ok(())
    }

    async fn analyze(&self) -> Result<()> {
        let session = self.session()?;
        let profile = session.load()?.profile;
        require_pro(profile.membership_status, "Rating increase analysis")?;
        if profile.disabilities.is_empty() {
            return Err(StrategyError::NoDisabilities.into());
        }

        let client = self.gemini()?;
        let increases = client.increase_strategies(&profile.disabilities).await?;
        debug!(count = increases.len(), "Received increase strategies");

        let strategy = session.update(move |p| {
            refresh_strategy(p, increases)?;
            Ok(p.strategy_data.clone())
        })?;

        if self.json {
            return render::print_json(&strategy);
        }
        render::increases(&strategy.potential_increases);
        println!();
        render::suggestions(&strategy.potential_new_claims);
        Ok(())
    }

    async fn extract(&self, file: PathBuf, dry_run: bool) -> Result<()> {
        let text = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        if text.trim().is_empty() {
            bail!("{} is empty", file.display());
        }

        // Resolve the profile before spending an API call on it
        let session = if dry_run { None } else { Some(self.session()?) };

        let data = self.gemini()?.extract_claim_data(&text).await?;

        let outcome = match &session {
            Some(session) => Some(session.update(|p| Ok(data.apply_to(p)))?),
            None => None,
        };

        if self.json {
            return render::print_json(&data);
        }
        render::extraction(&data, outcome.as_ref());
        Ok(())
    }

    async fn draft(&self, condition: &str, template: &str, no_save: bool) -> Result<()> {
        let template = parse_template(template)?;
        let session = self.session()?;
        let profile = session.load()?.profile;

        let claim = profile
            .claim(condition)
            .ok_or_else(|| ProfileError::ClaimNotFound(condition.to_string()))?;
        check_template_access(profile.membership_status, template, claim.claim_type)?;
        let condition = claim.name.clone();

        let content = self
            .gemini()?
            .draft_document(&profile, &condition, template)
            .await?;

        if !no_save {
            let (id, version) = session.update(|p| {
                let doc = p.save_document(&condition, template, &content);
                Ok((doc.id, doc.version))
            })?;
            eprintln!("Saved {} v{} as document {}.", template.title(), version, id);
        }
        println!("{}", content);
        Ok(())
    }

    fn document(&self, action: DocumentAction) -> Result<()> {
        let session = self.session()?;
        match action {
            DocumentAction::Templates { condition } => {
                let profile = session.load()?.profile;
                let claim = profile
                    .claim(&condition)
                    .ok_or_else(|| ProfileError::ClaimNotFound(condition.clone()))?;
                let pro = profile.membership_status.is_pro();
                for id in available_templates(claim.claim_type) {
                    let template = id.template();
                    let lock = if id.is_free() || pro { " " } else { "*" };
                    println!("{} {:<16} {}", lock, id.as_str(), template.title);
                    println!("  {:<16} {}", "", template.description);
                }
                if !pro {
                    println!();
                    println!("* requires Pro");
                }
            }
            DocumentAction::List { condition } => {
                let profile = session.load()?.profile;
                let docs = match &condition {
                    Some(c) => profile.documents_for(c),
                    None => profile.saved_documents.iter().collect(),
                };
                if self.json {
                    return render::print_json(&docs);
                }
                render::documents(&docs);
            }
            DocumentAction::Show { id } => {
                let profile = session.load()?.profile;
                let doc = profile
                    .saved_documents
                    .iter()
                    .find(|d| d.id == id)
                    .ok_or(ProfileError::DocumentNotFound(id))?;
                if self.json {
                    return render::print_json(doc);
                }
                println!("{} - {}", doc.display_title(), doc.condition_name);
                println!();
                println!("{}", doc.content);
            }
            DocumentAction::Edit { id, file } => {
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                session.update(|p| Ok(p.edit_document(id, &content)?))?;
                println!("Document {} updated.", id);
            }
            DocumentAction::Delete { id } => {
                let removed = session.update(|p| Ok(p.delete_document(id)?))?;
                println!("Deleted {}.", removed.display_title());
            }
        }
        Ok(())
    }

    fn membership(&self, action: MembershipAction) -> Result<()> {
        let session = self.session()?;
        let changed = match action {
            MembershipAction::Sync {
                status,
                subscription_id,
                previous_status,
            } => {
                let event = match subscription_id {
                    Some(subscription_id) => SubscriptionEvent::Created {
                        subscription_id,
                        status,
                    },
                    None => SubscriptionEvent::Updated {
                        previous_status: previous_status.unwrap_or_default(),
                        status,
                    },
                };
                session.update(|p| Ok(event.apply(p)))?
            }
            MembershipAction::Upgrade => session.update(|p| Ok(manual_upgrade(p)))?,
        };
        let profile = session.load()?.profile;
        if changed {
            println!("Membership is now {}.", profile.membership_status);
        } else {
            println!("Membership unchanged ({}).", profile.membership_status);
        }
        Ok(())
    }

    fn secret(&self, action: SecretAction) -> Result<()> {
        match action {
            SecretAction::Set { kind } => {
                let kind = parse_secret_kind(&kind)?;
                let value = rpassword::prompt_password(format!("{}: ", kind.account()))
                    .context("Failed to read key")?;
                if value.trim().is_empty() {
                    bail!("Nothing entered");
                }
                CredentialStore::store(kind, value.trim())?;
                println!("Stored {} in the keychain.", kind.account());
            }
            SecretAction::Delete { kind } => {
                let kind = parse_secret_kind(&kind)?;
                CredentialStore::delete(kind)?;
                println!("Removed {} from the keychain.", kind.account());
            }
            SecretAction::Status => {
                for kind in SecretKind::ALL {
                    let source = if std::env::var(kind.env_var()).is_ok_and(|v| !v.trim().is_empty()) {
                        kind.env_var()
                    } else if CredentialStore::has(kind) {
                        "keychain"
                    } else {
                        "not set"
                    };
                    println!("{:<20} {}", kind.account(), source);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_lists_choices() {
        assert_eq!(parse_template("nexus").ok(), Some(TemplateId::Nexus));
        let err = parse_template("will").unwrap_err().to_string();
        assert!(err.contains("personal"));
        assert!(err.contains("tdiu"));
    }

    #[test]
    fn test_parse_secret_kind() {
        assert_eq!(parse_secret_kind("gemini-api-key").ok(), Some(SecretKind::GeminiApiKey));
        assert!(parse_secret_kind("aws").is_err());
    }

    #[test]
    fn test_parse_date_arg() {
        assert!(parse_date_arg("date", "2004-03-01").is_ok());
        let err = parse_date_arg("release date", "03/01/2004").unwrap_err().to_string();
        assert!(err.contains("release date"));
    }
}
