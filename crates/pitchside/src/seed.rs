//! Fixture loading: build a populated market from one TOML file, for demos
//! and local development.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pitchside_models::team::SubscriptionTier;
use pitchside_models::{Session, Team};
use pitchside_store::StoreError;

use crate::error::MarketError;
use crate::service::Marketplace;

/// A market fixture. Players and videos reference their team by name, so
/// the file stays readable and needs no ids.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub teams: Vec<SeedTeam>,
    pub agents: Vec<SeedAgent>,
    pub players: Vec<SeedPlayer>,
    pub videos: Vec<SeedVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTeam {
    pub name: String,
    pub member_association: Option<String>,
    pub tier: SubscriptionTier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAgent {
    pub name: String,
    pub agency: Option<String>,
    pub member_association: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedPlayer {
    pub team: String,
    pub full_name: String,
    pub position: Option<String>,
    pub citizenship: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub bio: Option<String>,
    pub market_value: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedVideo {
    pub team: String,
    pub title: String,
    pub duration_seconds: Option<u32>,
}

/// An account a seed run created, by id. Follow-up commands need these ids.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatedAccount {
    pub id: Uuid,
    pub name: String,
}

/// What a seed run created.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: Vec<CreatedAccount>,
    pub agents: Vec<CreatedAccount>,
    pub players: usize,
    pub videos: usize,
}

fn lookup<'a>(teams: &'a HashMap<String, Team>, name: &str) -> Result<&'a Team, MarketError> {
    teams
        .get(name)
        .ok_or_else(|| MarketError::Store(StoreError::not_found("team", name)))
}

/// Apply a fixture through the regular service operations, so seeded data
/// passes the same checks as interactive use. Teams are created first; a
/// player or video naming an unknown team fails the run.
pub async fn apply(market: &Marketplace, seed: &SeedFile) -> Result<SeedSummary, MarketError> {
    let mut teams: HashMap<String, Team> = HashMap::new();
    let mut team_refs = Vec::with_capacity(seed.teams.len());
    for team in &seed.teams {
        let created =
            market.register_team(&team.name, team.member_association.as_deref(), team.tier)?;
        team_refs.push(CreatedAccount {
            id: created.id,
            name: created.name.clone(),
        });
        teams.insert(team.name.clone(), created);
    }

    let mut agent_refs = Vec::with_capacity(seed.agents.len());
    for agent in &seed.agents {
        let created = market.register_agent(
            &agent.name,
            agent.agency.as_deref(),
            agent.member_association.as_deref(),
        )?;
        agent_refs.push(CreatedAccount {
            id: created.id,
            name: created.name,
        });
    }

    for player in &seed.players {
        let team = lookup(&teams, &player.team)?;
        let session = Session::team(team.id);
        let created = market.add_player(&session, team.id, &player.full_name)?;
        let mut profile = created.clone();
        profile.position = player.position.clone();
        profile.citizenship = player.citizenship.clone();
        profile.date_of_birth = player.date_of_birth;
        profile.height_cm = player.height_cm;
        profile.weight_kg = player.weight_kg;
        profile.bio = player.bio.clone();
        profile.market_value = player.market_value;
        market.update_player(&session, &profile, created.updated_at)?;
    }

    for video in &seed.videos {
        let team = lookup(&teams, &video.team)?;
        let session = Session::team(team.id);
        let bytes = format!("placeholder footage: {}", video.title).into_bytes();
        market
            .add_video(
                &session,
                team.id,
                &video.title,
                "mp4",
                &bytes,
                video.duration_seconds,
            )
            .await?;
    }

    Ok(SeedSummary {
        teams: team_refs,
        agents: agent_refs,
        players: seed.players.len(),
        videos: seed.videos.len(),
    })
}
