//! Environment readiness check.

use super::RunArgs;
use crate::config::{default_profile_dir, Credentials};
use crate::renderer::chromium::find_chromium;
use anyhow::Result;

/// Check browser availability, credentials, model key, and profile dir.
pub async fn run(args: &RunArgs) -> Result<()> {
    println!("Signoff Doctor");
    println!("==============");
    println!();

    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let browser = args.chrome.clone().filter(|p| p.exists()).or_else(find_chromium);
    match &browser {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!("[!!] Chromium NOT found. Install Chrome or set SIGNOFF_CHROMIUM_PATH."),
    }

    let credentials = Credentials::resolve(args.email.clone(), args.password.clone());
    match &credentials {
        Ok(creds) => println!("[OK] Credentials set for {}", creds.email),
        Err(_) => println!("[!!] Email or password missing (SIGNOFF_EMAIL / SIGNOFF_PASSWORD)"),
    }

    if args
        .model
        .openai_api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty())
    {
        println!("[OK] Model key set ({})", args.model.model);
    } else {
        println!("[??] OPENAI_API_KEY not set; pattern extraction only");
    }

    match &args.sheet_url {
        Some(url) => println!("[OK] Spreadsheet: {url}"),
        None => println!("[??] No spreadsheet URL; the sample rows will be used"),
    }

    let profile = args.profile_dir.clone().unwrap_or_else(default_profile_dir);
    if profile.exists() {
        println!("[OK] Browser profile: {} ({})", profile.display(), args.profile_name);
    } else {
        println!(
            "[??] Browser profile {} does not exist yet; it will be created",
            profile.display()
        );
    }

    println!();
    if browser.is_some() && credentials.is_ok() {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}
