use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "product-cli")]
#[command(about = "Command-line client for the product API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
        #[arg(long)]
        category: String,
    },
    /// List all products
    List,
    /// Update fields of a product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a product
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let products_url = format!("{}/products", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Create {
            name,
            price,
            category,
        } => {
            client
                .post(&products_url)
                .json(&json!({"name": name, "price": price, "category": category}))
                .send()
                .await?
        }
        Commands::List => client.get(&products_url).send().await?,
        Commands::Update {
            id,
            name,
            price,
            category,
        } => {
            let mut body = Map::new();
            if let Some(name) = name {
                body.insert("name".into(), json!(name));
            }
            if let Some(price) = price {
                body.insert("price".into(), json!(price));
            }
            if let Some(category) = category {
                body.insert("category".into(), json!(category));
            }
            client
                .put(format!("{}/{}", products_url, id))
                .json(&Value::Object(body))
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{}/{}", products_url, id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            eprintln!("Message: {}", message);
        }
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
