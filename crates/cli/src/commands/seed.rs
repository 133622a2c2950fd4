//! Database seeding for a fresh install.
//!
//! Seeds a small sample catalog plus the site settings the storefront
//! expects (shipping config, banners, about page). Refuses to run when
//! the catalog already has rows, so it can never be pointed at a live
//! shop by accident.

use dona_onca_admin::db::products::{AdminProductRepository, ProductInput};
use dona_onca_admin::db::settings::{
    ABOUT_KEY, AboutContent, BANNERS_KEY, Banner, SHIPPING_KEY, SettingsRepository,
    default_shipping_config,
};
use dona_onca_core::{Price, ProductCategory};

use super::{CommandError, connect};

/// Seed a sample catalog and the default settings.
///
/// # Errors
///
/// Returns `CommandError::Invalid` when the products table is not empty.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        return Err(CommandError::Invalid(format!(
            "products table already has {existing} rows; seeding is for fresh databases only"
        )));
    }

    let products = AdminProductRepository::new(&pool);
    for input in sample_catalog() {
        let product = products.create(&input).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "seeded product");
    }

    let settings = SettingsRepository::new(&pool);
    settings.put(SHIPPING_KEY, &default_shipping_config()).await?;
    settings.put(BANNERS_KEY, &sample_banners()).await?;
    settings.put(ABOUT_KEY, &sample_about()).await?;
    tracing::info!("seeded site settings");

    tracing::info!("Seeding complete");
    Ok(())
}

fn sample_catalog() -> Vec<ProductInput> {
    vec![
        ProductInput {
            name: "Conjunto Esmeralda".to_string(),
            description: "Conjunto de renda com bojo removível.".to_string(),
            category: ProductCategory::Conjuntos,
            price: Price::from_centavos(14990),
            original_price: Some(Price::from_centavos(18990)),
            has_sizes: true,
            sizes: vec!["P".into(), "M".into(), "G".into()],
            has_colors: true,
            colors: vec!["Verde".into(), "Preto".into()],
            images: vec![],
            stock: 12,
            low_stock_alert: 3,
            active: true,
        },
        ProductInput {
            name: "Body Renda Clássico".to_string(),
            description: "Body de renda com transparência e fecho de colchete.".to_string(),
            category: ProductCategory::Bodies,
            price: Price::from_centavos(12990),
            original_price: None,
            has_sizes: true,
            sizes: vec!["P".into(), "M".into(), "G".into(), "GG".into()],
            has_colors: true,
            colors: vec!["Preto".into(), "Vermelho".into()],
            images: vec![],
            stock: 8,
            low_stock_alert: 3,
            active: true,
        },
        ProductInput {
            name: "Camisola Cetim Luar".to_string(),
            description: "Camisola de cetim com alças ajustáveis.".to_string(),
            category: ProductCategory::Camisolas,
            price: Price::from_centavos(16990),
            original_price: None,
            has_sizes: true,
            sizes: vec!["M".into(), "G".into()],
            has_colors: false,
            colors: vec![],
            images: vec![],
            stock: 5,
            low_stock_alert: 2,
            active: true,
        },
        ProductInput {
            name: "Calcinha Fio Duplo".to_string(),
            description: "Calcinha fio dental com tiras duplas.".to_string(),
            category: ProductCategory::Lingerie,
            price: Price::from_centavos(4990),
            original_price: None,
            has_sizes: true,
            sizes: vec!["P".into(), "M".into(), "G".into()],
            has_colors: true,
            colors: vec!["Preto".into(), "Branco".into(), "Rosa".into()],
            images: vec![],
            stock: 30,
            low_stock_alert: 8,
            active: true,
        },
        ProductInput {
            name: "Óleo Corporal Cintilante".to_string(),
            description: "Óleo hidratante com partículas de brilho.".to_string(),
            category: ProductCategory::Cosmeticos,
            price: Price::from_centavos(5990),
            original_price: None,
            has_sizes: false,
            sizes: vec![],
            has_colors: false,
            colors: vec![],
            images: vec![],
            stock: 20,
            low_stock_alert: 5,
            active: true,
        },
        ProductInput {
            name: "Máscara de Cetim".to_string(),
            description: "Máscara de dormir em cetim, ajuste elástico.".to_string(),
            category: ProductCategory::Acessorios,
            price: Price::from_centavos(3490),
            original_price: None,
            has_sizes: false,
            sizes: vec![],
            has_colors: true,
            colors: vec!["Preto".into(), "Vinho".into()],
            images: vec![],
            stock: 15,
            low_stock_alert: 4,
            active: true,
        },
    ]
}

fn sample_banners() -> Vec<Banner> {
    vec![Banner {
        image: "/banners/lancamento.jpg".to_string(),
        title: "Coleção de Lançamento".to_string(),
        subtitle: Some("Peças novas toda semana".to_string()),
        link: Some("/products".to_string()),
    }]
}

fn sample_about() -> AboutContent {
    AboutContent {
        title: "Sobre a Dona Onça".to_string(),
        body: "Lingerie pensada para o dia a dia, feita no Brasil.".to_string(),
        team_photos: vec![],
    }
}
