use anyhow::Context;
use clap::Args;

use crate::auth::{generate_jwt, Claims};
use crate::config::AppConfig;
use crate::types::Plan;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Identity provider user id (token subject)")]
    pub user: String,

    #[arg(long, default_value = "free", help = "Plan claim: free or premium")]
    pub plan: String,

    #[arg(long, help = "Lifetime in hours (defaults to configured expiry)")]
    pub hours: Option<u64>,
}

/// Print an HS256 token signed with the configured secret
pub fn handle(args: TokenArgs, config: &AppConfig) -> anyhow::Result<()> {
    let plan = Plan::from_claim(Some(&args.plan));
    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let claims = Claims::new(args.user, plan, hours);

    let token = generate_jwt(&claims, &config.security).context("failed to sign token")?;
    println!("{}", token);
    Ok(())
}
