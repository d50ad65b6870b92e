use accommo_scout::api::ApiClient;
use accommo_scout::config::Config;
use accommo_scout::models::{split_amenities, Listing, ListingDraft, PropertyType, Role, User};
use accommo_scout::search::{self, Criteria, ListingFeed, Selection, SortKey};
use accommo_scout::session::SessionStore;
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "accommo-scout", version, about = "Student housing listing client")]
pub struct Cli {
    /// Base URL of the accommodation API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the persisted session
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account and start a session
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// "user" or "broker"
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Authenticate and start a session
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the current session, if any
    Whoami,
    /// Fetch listings and apply filter/sort criteria
    Search(SearchArgs),
    /// Show one listing by id
    Show { id: u64 },
    /// List the listings owned by the logged-in broker
    Mine,
    /// Create a listing (broker only)
    Create(DraftArgs),
    /// Update a listing; the full metadata is resent
    Update {
        id: u64,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a listing
    Delete { id: u64 },
}

#[derive(Args)]
pub struct SearchArgs {
    /// Restore criteria from a saved query string (individual flags override)
    #[arg(long)]
    query: Option<String>,

    /// Substring matched against title and address, case-insensitive
    #[arg(long)]
    search: Option<String>,

    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    min_distance: Option<f64>,
    #[arg(long)]
    max_distance: Option<f64>,

    /// Required amenity; repeat for several (all must be present)
    #[arg(long = "amenity")]
    amenities: Vec<String>,

    /// Exact bedroom count, or "any"
    #[arg(long)]
    bedrooms: Option<String>,
    /// Exact bathroom count, or "any"
    #[arg(long)]
    bathrooms: Option<String>,
    /// Apartment, House, Studio or Dormitory, or "any"
    #[arg(long)]
    property_type: Option<String>,

    /// price_asc, price_desc, distance_asc or distance_desc
    #[arg(long)]
    sort_by: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct DraftArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    address: String,
    /// Monthly price
    #[arg(long)]
    price: f64,
    /// Distance from the university in km
    #[arg(long)]
    distance: f64,
    /// Comma-separated amenity list, e.g. "WiFi, AC, Parking"
    #[arg(long, default_value = "")]
    amenities: String,
    #[arg(long)]
    contact_email: String,
    #[arg(long)]
    contact_phone: String,
    /// Photo attachment; repeat for several
    #[arg(long = "photo")]
    photos: Vec<PathBuf>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.api_url, cli.state_dir);
    let client = ApiClient::new(&config.base_url)?;
    let mut session = SessionStore::new(&config.state_dir);
    session.restore(&client);

    match cli.command {
        Command::Signup {
            username,
            email,
            password,
            role,
        } => {
            let user = session
                .signup(&client, &username, &email, &password, role)
                .await?;
            println!("Registered and logged in as {} ({})", user.username, user.role.as_str());
        }
        Command::Login { username, password } => {
            let user = session.login(&client, &username, &password).await?;
            println!("Logged in as {} ({})", user.username, user.role.as_str());
        }
        Command::Logout => {
            session.logout(&client);
            println!("Logged out");
        }
        Command::Whoami => match session.current_user() {
            Some(user) => println!(
                "{} <{}> ({})",
                user.username,
                user.email,
                user.role.as_str()
            ),
            None => println!("Not logged in"),
        },
        Command::Search(args) => search_listings(&client, args).await?,
        Command::Show { id } => {
            let listing = client.get_listing(id).await?;
            print_listing(0, &listing);
        }
        Command::Mine => {
            let user = require_broker(&session)?;
            let listings = client.listings_by_broker(user.id).await?;
            info!("🏠 {} listings for broker {}", listings.len(), user.username);
            for (i, listing) in listings.iter().enumerate() {
                print_listing(i + 1, listing);
            }
        }
        Command::Create(args) => {
            let user = require_broker(&session)?;
            let draft = args.draft(&user.username);
            let created = client.create_listing(&draft, &args.photos).await?;
            println!("✅ Created listing {} ({})", created.id, created.title);
        }
        Command::Update { id, draft: args } => {
            let user = require_broker(&session)?;
            let draft = args.draft(&user.username);
            let updated = client.update_listing(id, &draft, &args.photos).await?;
            println!("✅ Updated listing {} ({})", updated.id, updated.title);
        }
        Command::Delete { id } => {
            require_broker(&session)?;
            client.delete_listing(id).await?;
            println!("Deleted listing {id}");
        }
    }

    Ok(())
}

async fn search_listings(client: &ApiClient, args: SearchArgs) -> Result<()> {
    let criteria = args.criteria()?;

    let mut feed = ListingFeed::new();
    let ticket = feed.begin_fetch();
    let listings = client.list_listings().await?;
    feed.commit(ticket, listings);

    let results = search::apply(feed.listings(), &criteria);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    info!(
        "🔎 {} of {} listings match",
        results.len(),
        feed.listings().len()
    );
    for (i, listing) in results.iter().enumerate() {
        print_listing(i + 1, listing);
    }
    println!("Shareable query: ?{}", criteria.to_query());
    Ok(())
}

fn print_listing(index: usize, listing: &Listing) {
    if index > 0 {
        println!("{}. {} ({})", index, listing.title, listing.property_type);
    } else {
        println!("{} ({})", listing.title, listing.property_type);
    }
    println!("   {}", listing.address);
    println!(
        "   {} / month, {} km from campus, {} bed / {} bath",
        listing.price, listing.distance_from_university, listing.bedrooms, listing.bathrooms
    );
    if !listing.amenities.is_empty() {
        println!("   Amenities: {}", listing.amenities.join(", "));
    }
    if !listing.photos.is_empty() {
        println!("   Photos: {}", listing.photos.len());
    }
    println!(
        "   Contact: {} / {}   ID: {}",
        listing.contact_email, listing.contact_phone, listing.id
    );
    println!();
}

fn require_broker(session: &SessionStore) -> Result<&User> {
    let Some(user) = session.current_user() else {
        bail!("Not logged in; run `accommo-scout login` first");
    };
    if user.role != Role::Broker {
        bail!("This action needs a broker account");
    }
    Ok(user)
}

impl SearchArgs {
    fn criteria(&self) -> Result<Criteria> {
        let mut criteria = match &self.query {
            Some(q) => Criteria::from_query(q),
            None => Criteria::default(),
        };

        if let Some(s) = &self.search {
            criteria.search = s.clone();
        }
        if let Some(v) = self.min_price {
            criteria.min_price = v;
        }
        if let Some(v) = self.max_price {
            criteria.max_price = v;
        }
        if let Some(v) = self.min_distance {
            criteria.min_distance = v;
        }
        if let Some(v) = self.max_distance {
            criteria.max_distance = v;
        }
        if !self.amenities.is_empty() {
            criteria.amenities = self.amenities.clone();
        }
        if let Some(v) = &self.bedrooms {
            criteria.bedrooms = parse_count_selection(v)
                .with_context(|| format!("invalid --bedrooms value: {v}"))?;
        }
        if let Some(v) = &self.bathrooms {
            criteria.bathrooms = parse_count_selection(v)
                .with_context(|| format!("invalid --bathrooms value: {v}"))?;
        }
        if let Some(v) = &self.property_type {
            criteria.property_type = if v.eq_ignore_ascii_case("any") {
                Selection::Any
            } else {
                match PropertyType::parse(v) {
                    Some(t) => Selection::Exact(t),
                    None => bail!("invalid --property-type value: {v}"),
                }
            };
        }
        if let Some(v) = &self.sort_by {
            criteria.sort_by = SortKey::parse(v);
        }

        if criteria.min_price > criteria.max_price {
            bail!("min price is above max price");
        }
        if criteria.min_distance > criteria.max_distance {
            bail!("min distance is above max distance");
        }

        Ok(criteria)
    }
}

fn parse_count_selection(value: &str) -> Result<Selection<u32>> {
    if value.eq_ignore_ascii_case("any") {
        return Ok(Selection::Any);
    }
    let n = value.parse::<u32>()?;
    Ok(Selection::Exact(n))
}

impl DraftArgs {
    /// The broker username always comes from the active session, never from
    /// a flag, so a listing cannot be filed under someone else's name.
    fn draft(&self, broker_username: &str) -> ListingDraft {
        ListingDraft {
            title: self.title.clone(),
            address: self.address.clone(),
            price: self.price,
            distance_from_university: self.distance,
            amenities: split_amenities(&self.amenities),
            contact_email: self.contact_email.clone(),
            contact_phone: self.contact_phone.clone(),
            broker_username: broker_username.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_selection_accepts_any_and_numbers() {
        assert_eq!(parse_count_selection("any").unwrap(), Selection::Any);
        assert_eq!(parse_count_selection("3").unwrap(), Selection::Exact(3));
        assert!(parse_count_selection("lots").is_err());
    }

    #[test]
    fn flags_override_restored_query() {
        let args = SearchArgs {
            query: Some("search=old&minPrice=100&sortBy=distance_desc".to_string()),
            search: Some("new".to_string()),
            min_price: None,
            max_price: None,
            min_distance: None,
            max_distance: None,
            amenities: vec![],
            bedrooms: None,
            bathrooms: None,
            property_type: None,
            sort_by: None,
            json: false,
        };
        let criteria = args.criteria().unwrap();
        assert_eq!(criteria.search, "new");
        assert_eq!(criteria.min_price, 100.0);
        assert_eq!(criteria.sort_by, SortKey::DistanceDesc);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let args = SearchArgs {
            query: None,
            search: None,
            min_price: Some(5000.0),
            max_price: Some(1000.0),
            min_distance: None,
            max_distance: None,
            amenities: vec![],
            bedrooms: None,
            bathrooms: None,
            property_type: None,
            sort_by: None,
            json: false,
        };
        assert!(args.criteria().is_err());
    }
}
