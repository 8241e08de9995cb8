//! Entry point for the sysdash TUI. Parses args, resolves the backend, and runs the App.

use std::env;
use std::io::{self, Write};

use sysdash::app::App;
use sysdash::config::{parse_interval, DashboardConfig, Endpoints, BACKEND_URL_ENV};
use sysdash::profiles::{
    load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile,
};
use sysdash::{logging, Dashboard};

const USAGE: &str = concat!(
    "[--profile NAME|-P NAME] [--save] [--interval SECS|-i SECS] ",
    "[--dry-run] [http://HOST:PORT]"
);

#[derive(Debug, Default)]
struct ParsedArgs {
    url: Option<String>,
    profile: Option<String>,
    interval: Option<u32>,
    save: bool,
    dry_run: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "sysdash".into());
    let mut parsed = ParsedArgs::default();
    let mut interval_arg: Option<String> = None;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(format!("Usage: {prog} {USAGE}"));
            }
            "--profile" | "-P" => {
                parsed.profile = it.next();
            }
            "--interval" | "-i" => {
                interval_arg = it.next();
            }
            "--save" => {
                parsed.save = true;
            }
            "--dry-run" => {
                parsed.dry_run = true;
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        parsed.profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--interval=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    interval_arg = Some(v.to_string());
                }
            }
            _ => {
                if parsed.url.is_none() {
                    parsed.url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE}"));
                }
            }
        }
    }
    if let Some(v) = interval_arg {
        parsed.interval = Some(parse_interval(&v).map_err(|e| e.to_string())?);
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(());
        }
    };

    // The environment setting stands in for a URL only when no profile is named
    if parsed.url.is_none() && parsed.profile.is_none() {
        parsed.url = env::var(BACKEND_URL_ENV).ok().filter(|s| !s.trim().is_empty());
    }

    let Some(endpoints) = resolve_connection(&parsed)? else {
        return Ok(());
    };

    if parsed.dry_run {
        println!("stream: {}", endpoints.stream);
        println!("health: {}", endpoints.health);
        return Ok(());
    }

    if let Err(e) = logging::init() {
        eprintln!("logging disabled: {e}");
    }
    tracing::info!(stream = %endpoints.stream, health = %endpoints.health, "starting");

    let mut dashboard = Dashboard::new(DashboardConfig::new(endpoints))?;
    // Ctrl-C arrives as a key event while the terminal is in raw mode
    let mut app = App::new();
    app.run(&mut dashboard).await
}

// Profile resolution; None means the user aborted or nothing was configured.
// A URL is validated before it is ever written to a profile.
fn resolve_connection(parsed: &ParsedArgs) -> anyhow::Result<Option<Endpoints>> {
    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        interval: parsed.interval,
    };
    let outcome = req.resolve(&profiles_file);

    let mut profiles_mut = profiles_file.clone();
    let resolved = match outcome {
        ResolveProfile::Direct(u, i) => {
            let endpoints = Endpoints::resolve(&u, i)?;
            // Possibly save if profile specified and --save or new entry
            if let Some(name) = parsed.profile.as_ref() {
                let entry = ProfileEntry { url: u.clone(), interval: i };
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut.profiles.insert(name.clone(), entry);
                        save_profiles(&profiles_mut)?;
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || prompt_yes_no(&format!(
                                "Overwrite existing profile '{name}'? [y/N]: "
                            ));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry);
                            save_profiles(&profiles_mut)?;
                        }
                    }
                    Some(_) => {}
                }
            }
            endpoints
        }
        ResolveProfile::Loaded(u, i) => Endpoints::resolve(&u, i)?,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let Some(name) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
            else {
                return Ok(None);
            };
            match profiles_mut.profiles.get(name) {
                Some(entry) => Endpoints::resolve(&entry.url, parsed.interval.or(entry.interval))?,
                None => return Ok(None),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter backend URL (http://HOST:PORT): ")?;
            let url = url.trim().to_string();
            if url.is_empty() {
                return Ok(None);
            }
            let endpoints = Endpoints::resolve(&url, parsed.interval)?;
            profiles_mut.profiles.insert(
                name,
                ProfileEntry {
                    url,
                    interval: parsed.interval,
                },
            );
            save_profiles(&profiles_mut)?;
            endpoints
        }
        ResolveProfile::None => {
            eprintln!("No URL provided, {BACKEND_URL_ENV} is unset, and no profiles to select.");
            return Ok(None);
        }
    };
    Ok(Some(resolved))
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
