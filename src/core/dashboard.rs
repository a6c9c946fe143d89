//! Application state for the shared-library dashboard.
//!
//! A [`Dashboard`] owns the registered accounts, each account's raw
//! catalog, and the merged library derived from them. Every change goes
//! through [`merge_library`], and the library is re-sorted by name after
//! each one.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::adapters::{ApiError, CatalogApi};
use crate::domain::{AccountProfile, CatalogEntry, RawEntry};
use crate::library::{merge_library, sort_by_name};

/// Errors surfaced to the user by dashboard operations
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Enter a Steam ID or vanity URL.")]
    EmptyIdentifier,

    #[error("User not found or Private Profile")]
    GamesUnavailable(#[source] ApiError),

    #[error("User profile fetch failed")]
    ProfileUnavailable(#[source] ApiError),

    #[error("User already added.")]
    AlreadyAdded { steamid: String },

    #[error("Unexpected game list for {identifier}")]
    UnexpectedCatalog { identifier: String },

    #[error("Could not fetch friends list. Profile might be private.")]
    FriendsUnavailable(#[source] ApiError),
}

/// What is known about one account's games
#[derive(Debug, Clone, PartialEq)]
pub enum RawCatalog {
    Available(Vec<RawEntry>),
    /// The fetch failed or returned something other than a list
    Unavailable,
}

/// Game count shown on an account card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCount {
    /// Not fetched yet
    Pending,
    /// Fetch failed, or the library is empty or hidden
    Unavailable,
    Count(usize),
}

impl std::fmt::Display for GameCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameCount::Pending => write!(f, "..."),
            GameCount::Unavailable => write!(f, "N/A"),
            GameCount::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Result of expanding an account's friends list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendsOutcome {
    /// The friends list was empty
    NoFriends,
    /// Every public friend is already registered
    AllAlreadyAdded,
    /// `added` accounts registered, `with_games` of them with a readable library
    Added { added: usize, with_games: usize },
}

/// Registered accounts plus their merged library
pub struct Dashboard<A> {
    api: A,
    accounts: Vec<AccountProfile>,
    raw_catalogs: HashMap<String, RawCatalog>,
    library: Vec<CatalogEntry>,
}

impl<A: CatalogApi> Dashboard<A> {
    /// Create an empty dashboard backed by `api`
    pub fn new(api: A) -> Self {
        Self {
            api,
            accounts: Vec::new(),
            raw_catalogs: HashMap::new(),
            library: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Registered accounts, in the order they were added
    pub fn accounts(&self) -> &[AccountProfile] {
        &self.accounts
    }

    /// The merged library, sorted by name
    pub fn library(&self) -> &[CatalogEntry] {
        &self.library
    }

    pub fn raw_catalog(&self, steamid: &str) -> Option<&RawCatalog> {
        self.raw_catalogs.get(steamid)
    }

    pub fn find_account(&self, steamid: &str) -> Option<&AccountProfile> {
        self.accounts.iter().find(|a| a.steamid == steamid)
    }

    pub fn find_entry(&self, appid: u64) -> Option<&CatalogEntry> {
        self.library.iter().find(|e| e.appid() == appid)
    }

    pub fn game_count(&self, steamid: &str) -> GameCount {
        match self.raw_catalogs.get(steamid) {
            None => GameCount::Pending,
            Some(RawCatalog::Unavailable) => GameCount::Unavailable,
            Some(RawCatalog::Available(games)) if games.is_empty() => GameCount::Unavailable,
            Some(RawCatalog::Available(games)) => GameCount::Count(games.len()),
        }
    }

    /// Register an account by Steam ID or vanity name and merge its games.
    ///
    /// Games are fetched before the profile; nothing changes unless both
    /// succeed and the account is not registered yet.
    #[instrument(skip(self))]
    pub async fn add_account(&mut self, identifier: &str) -> Result<&AccountProfile, DashboardError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(DashboardError::EmptyIdentifier);
        }

        let games = self
            .api
            .owned_games(identifier)
            .await
            .map_err(DashboardError::GamesUnavailable)?;

        let profile = self
            .api
            .user_summary(identifier)
            .await
            .map_err(DashboardError::ProfileUnavailable)?;

        if self.find_account(&profile.steamid).is_some() {
            return Err(DashboardError::AlreadyAdded {
                steamid: profile.steamid,
            });
        }

        if !games.is_array() {
            return Err(DashboardError::UnexpectedCatalog {
                identifier: identifier.to_string(),
            });
        }
        let games = RawEntry::parse_list(&games);

        info!(
            steamid = %profile.steamid,
            owner = %profile.personaname,
            games = games.len(),
            "Adding account"
        );

        let mut library = merge_library(&self.library, &games, &profile.personaname);
        sort_by_name(&mut library);
        self.library = library;
        self.raw_catalogs
            .insert(profile.steamid.clone(), RawCatalog::Available(games));
        self.accounts.push(profile);

        Ok(&self.accounts[self.accounts.len() - 1])
    }

    /// Register every public friend of `steamid` that is not registered yet.
    ///
    /// All new friends are listed first, then their libraries are fetched one
    /// at a time. A friend whose library cannot be read stays registered
    /// with an unavailable catalog.
    #[instrument(skip(self))]
    pub async fn add_friends(&mut self, steamid: &str) -> Result<FriendsOutcome, DashboardError> {
        let friends = self
            .api
            .friends(steamid)
            .await
            .map_err(DashboardError::FriendsUnavailable)?;

        if friends.is_empty() {
            return Ok(FriendsOutcome::NoFriends);
        }

        let mut seen: HashSet<String> = self.accounts.iter().map(|a| a.steamid.clone()).collect();
        let new_friends: Vec<AccountProfile> = friends
            .into_iter()
            .filter(|f| seen.insert(f.steamid.clone()))
            .collect();

        if new_friends.is_empty() {
            return Ok(FriendsOutcome::AllAlreadyAdded);
        }

        info!(count = new_friends.len(), "Adding friends");
        self.accounts.extend(new_friends.iter().cloned());

        let mut with_games = 0;
        for friend in &new_friends {
            let catalog = match self.api.owned_games(&friend.steamid).await {
                Ok(body) if body.is_array() => RawCatalog::Available(RawEntry::parse_list(&body)),
                Ok(_) => {
                    warn!(owner = %friend.personaname, "Friend library is not a list");
                    RawCatalog::Unavailable
                }
                Err(e) => {
                    warn!(owner = %friend.personaname, error = %e, "Failed to fetch friend library");
                    RawCatalog::Unavailable
                }
            };

            if let RawCatalog::Available(ref games) = catalog {
                with_games += 1;
                let mut library = merge_library(&self.library, games, &friend.personaname);
                sort_by_name(&mut library);
                self.library = library;
            }
            self.raw_catalogs.insert(friend.steamid.clone(), catalog);
        }

        Ok(FriendsOutcome::Added {
            added: new_friends.len(),
            with_games,
        })
    }

    /// Unregister an account and rebuild the library from those that remain
    #[instrument(skip(self))]
    pub fn remove_account(&mut self, steamid: &str) -> Option<AccountProfile> {
        let pos = self.accounts.iter().position(|a| a.steamid == steamid)?;
        let removed = self.accounts.remove(pos);
        self.raw_catalogs.remove(steamid);

        let mut library = Vec::new();
        for account in &self.accounts {
            if let Some(RawCatalog::Available(games)) = self.raw_catalogs.get(&account.steamid) {
                library = merge_library(&library, games, &account.personaname);
            }
        }
        sort_by_name(&mut library);
        self.library = library;

        info!(owner = %removed.personaname, remaining = self.accounts.len(), "Removed account");
        Some(removed)
    }
}
