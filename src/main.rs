use clap::Parser;
use storefront_cart::utils::error::ErrorCategory;
use storefront_cart::utils::logger;
use storefront_cart::{
    AmountUpdate, CartProvider, CartSettings, ChannelNotifier, CliConfig, Command, HttpCatalog,
    LocalStorage, Product, UpdateProductAmount,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 解析並驗證配置
    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }

    tracing::info!("Starting storefront-cart");
    tracing::debug!("Resolved settings: {:?}", settings);

    let code = run(&settings, cli.command).await?;
    if code > 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn run(settings: &CartSettings, command: Command) -> anyhow::Result<i32> {
    let (notifier, mut notices) = ChannelNotifier::new();
    let provider = CartProvider::mount(
        HttpCatalog::from_config(settings)?,
        LocalStorage::from_config(settings),
        notifier,
        settings.storage_key.clone(),
    )
    .await?;
    let cart = provider.use_cart();

    let result = match command {
        Command::List => {
            print_cart(&cart.cart());
            Ok(())
        }
        Command::Summary => {
            let summary = cart.summary();
            println!(
                "🛒 {} product(s), {} unit(s), subtotal {:.2}",
                summary.distinct_items, summary.total_units, summary.subtotal
            );
            Ok(())
        }
        Command::Add { product_id } => cart.add_product(product_id).await.map(|items| {
            print_cart(&items);
        }),
        Command::Remove { product_id } => cart.remove_product(product_id).await.map(|items| {
            print_cart(&items);
        }),
        Command::Update { product_id, amount } => cart
            .update_product_amount(UpdateProductAmount { product_id, amount })
            .await
            .map(|outcome| match outcome {
                AmountUpdate::Applied(items) => print_cart(&items),
                AmountUpdate::Ignored => println!("Nothing to update for amount {}", amount),
            }),
    };

    // 顯示通知 (toast)
    while let Ok(notice) = notices.try_recv() {
        eprintln!("⚠️  {}", notice);
    }

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            tracing::error!(
                "❌ Cart operation failed: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 根據錯誤類別決定退出碼
            let exit_code = match e.category() {
                ErrorCategory::Validation | ErrorCategory::Logical => 2,
                ErrorCategory::Lookup => 3,
                ErrorCategory::Infrastructure => 4,
                ErrorCategory::Configuration => 1,
            };
            Ok(exit_code)
        }
    }
}

fn print_cart(items: &[Product]) {
    if items.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    for item in items {
        println!(
            "#{:<4} {:<50} {:>3} x {:>8.2} = {:>9.2}",
            item.id,
            item.title,
            item.amount,
            item.price,
            item.price * f64::from(item.amount)
        );
    }
}
