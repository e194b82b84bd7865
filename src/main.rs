//src/main.rs

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use portal_client::{
    models::{
        auth::LoginForm, catalog::ProductForm, crm::ClientForm, production::ProductionForm,
        tenancy::UserForm,
    },
    AppConfig, AppError, AppState, Entity, ImageAsset, ListState, RemoteListStore,
};

#[derive(Parser)]
#[command(name = "portal", about = "Portal de empleados desde la terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inicia sesión y guarda el token
    Login {
        #[arg(long, env = "PORTAL_EMAIL")]
        email: String,
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Muestra la sesión guardada
    Whoami,
    Products,
    Production,
    Clients,
    Branches,
    /// Sucursal del usuario en sesión
    Branch,
    Reports {
        id_sucursal: i64,
        #[arg(long)]
        desde: Option<NaiveDate>,
        #[arg(long)]
        hasta: Option<NaiveDate>,
    },
    Report {
        id_sucursal: i64,
        fecha: NaiveDate,
    },
    SalesToday {
        id_sucursal: i64,
    },
    RequestSync {
        id_sucursal: i64,
    },
    AddProduct {
        #[arg(long)]
        descripcion: String,
        #[arg(long)]
        unidad: String,
        #[arg(long)]
        precio: String,
        #[arg(long)]
        imagen: Option<String>,
    },
    AddProduction {
        #[arg(long)]
        kg: String,
        #[arg(long)]
        total: String,
        #[arg(long, default_value = "")]
        devolucion: String,
        #[arg(long)]
        cliente: i64,
    },
    AddClient {
        #[arg(long)]
        nombre: String,
        #[arg(long, default_value = "")]
        razon_social: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        telefono: String,
        #[arg(long, default_value = "")]
        direccion: String,
    },
    AddUser {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        sucursal: Option<i64>,
    },
    /// Cambia la imagen de la sucursal
    BranchImage {
        imagen: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let state = AppState::new(AppConfig::from_env()?)?;

    match run(&state, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            if e.is_session_expired() {
                eprintln!("Ejecuta `portal login` para continuar.");
            } else if e.is_connection() {
                eprintln!("Revisa PORTAL_API_TARGET / PORTAL_API_BASE_URL.");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    match command {
        Command::Login { email, password } => {
            let session = state.auth_service.login(&LoginForm::new(email, password)).await?;
            let nombre = session.profile.as_ref().and_then(|p| p.nombre()).unwrap_or("usuario");
            println!("Bienvenido, {nombre}");
        }
        Command::Logout => state.auth_service.logout().await?,
        Command::Whoami => {
            let session = state.auth_service.current_session().await?;
            match session.profile {
                Some(profile) => print_json(&profile)?,
                None if session.is_authenticated() => println!("Sesión activa sin perfil"),
                None => println!("Sin sesión"),
            }
        }
        Command::Products => show_list(state.catalog_service.products()).await?,
        Command::Production => show_list(state.production_service.entries()).await?,
        Command::Clients => show_list(state.crm_service.clients()).await?,
        Command::Branches => show_list(state.tenancy_service.branches()).await?,
        Command::Branch => match state.tenancy_service.branch_info().await? {
            Some(branch) => print_json(&branch)?,
            None => println!("Información de sucursal no disponible"),
        },
        Command::Reports { id_sucursal, desde, hasta } => {
            let store = state.sales_service.reports(id_sucursal);
            store.set_date_range(desde, hasta).await;
            show_list(store).await?;
        }
        Command::Report { id_sucursal, fecha } => {
            match state.sales_service.report_detail(id_sucursal, fecha).await? {
                Some(report) => print_json(&report)?,
                None => println!("Sin reporte para {fecha}"),
            }
        }
        Command::SalesToday { id_sucursal } => {
            let today = state.sales_service.sales_today(id_sucursal).await?;
            println!("Fuente: {}", today.path);
            print_json(&today.payload)?;
        }
        Command::RequestSync { id_sucursal } => {
            print_json(&state.sales_service.request_sync(id_sucursal).await?)?;
        }
        Command::AddProduct { descripcion, unidad, precio, imagen } => {
            let form = ProductForm {
                descripcion,
                unidad_medida: unidad,
                precio,
                imagen: imagen.as_deref().map(ImageAsset::from_uri),
            };
            state.catalog_service.create_product(&form).await?;
            println!("Producto agregado correctamente.");
        }
        Command::AddProduction { kg, total, devolucion, cliente } => {
            let form = ProductionForm {
                produccion_kg: kg,
                total,
                devolucion,
                id_cliente: Some(cliente),
            };
            state.production_service.create_production(&form).await?;
            println!("Producción agregada correctamente.");
        }
        Command::AddClient { nombre, razon_social, email, telefono, direccion } => {
            let form = ClientForm { nombre, razon_social, email, telefono, direccion };
            state.crm_service.create_client(&form).await?;
            println!("Cliente agregado correctamente.");
        }
        Command::AddUser { nombre, email, password, sucursal } => {
            let form = UserForm { nombre, email, password, id_sucursal: sucursal };
            state.tenancy_service.create_user(&form).await?;
            println!("Usuario agregado correctamente.");
        }
        Command::BranchImage { imagen } => {
            state
                .tenancy_service
                .update_branch_image(&ImageAsset::from_uri(&imagen))
                .await?;
            println!("Imagen de sucursal actualizada.");
        }
    }
    Ok(())
}

async fn show_list<T: Entity + Serialize>(store: RemoteListStore<T>) -> Result<(), AppError> {
    store.load().await;
    if let Some(e) = store.take_error().await {
        return Err(e);
    }

    let ListState { items, .. } = store.state().await;

    if items.is_empty() {
        println!("Sin registros");
        return Ok(());
    }
    print_json(&items)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
