use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use catalogo::{
    producto::{NewProducto, Producto},
    store::ProductoStore,
};
use clap::Parser;
use colored::Colorize;
use log::info;

use crate::{config::DatabaseArgs, Runnable};

/// Adds a producto to the catalog
#[derive(Parser)]
pub struct Create {
    #[arg(long)]
    pub nombre: String,
    #[arg(long, allow_negative_numbers = true)]
    pub precio: i32,
    /// Marks the producto as not available
    #[arg(long)]
    pub no_disponible: bool,
    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl Create {
    fn new_producto(&self) -> NewProducto {
        let producto = NewProducto::new(self.nombre.clone(), self.precio);
        if self.no_disponible {
            producto.disponible(false)
        } else {
            producto
        }
    }
}

#[async_trait]
impl Runnable for Create {
    async fn run(&mut self) -> Result<()> {
        let store = self.database.store().await?;
        let producto = store
            .create(self.new_producto())
            .await
            .context("could not create producto")?;

        info!("created producto {}", producto.id);
        print_productos(&[producto]);
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.database.verbose
    }
}

/// Shows one producto
#[derive(Parser)]
pub struct Get {
    pub id: i64,
    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[async_trait]
impl Runnable for Get {
    async fn run(&mut self) -> Result<()> {
        let store = self.database.store().await?;
        let producto = store.get(self.id).await?;
        print_productos(&[producto]);
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.database.verbose
    }
}

/// Lists productos, optionally only those with an exact nombre
#[derive(Parser)]
pub struct List {
    #[arg(long)]
    pub nombre: Option<String>,
    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[async_trait]
impl Runnable for List {
    async fn run(&mut self) -> Result<()> {
        let store = self.database.store().await?;
        let productos = match &self.nombre {
            Some(nombre) => store.find_by_nombre(nombre).await?,
            None => store.list().await?,
        };
        print_productos(&productos);
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.database.verbose
    }
}

/// Changes fields of an existing producto
#[derive(Parser)]
pub struct Update {
    pub id: i64,
    #[arg(long)]
    pub nombre: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub precio: Option<i32>,
    #[arg(long)]
    pub disponible: Option<bool>,
    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl Update {
    /// Assigns the requested fields, returning whether anything was requested.
    fn apply(&self, producto: &mut Producto) -> bool {
        let mut changed = false;
        if let Some(nombre) = &self.nombre {
            producto.nombre = nombre.clone();
            changed = true;
        }
        if let Some(precio) = self.precio {
            producto.precio = precio;
            changed = true;
        }
        if let Some(disponible) = self.disponible {
            producto.disponible = disponible;
            changed = true;
        }
        changed
    }
}

#[async_trait]
impl Runnable for Update {
    async fn run(&mut self) -> Result<()> {
        let store = self.database.store().await?;
        let mut producto = store.get(self.id).await?;
        if !self.apply(&mut producto) {
            bail!("nothing to update: pass --nombre, --precio or --disponible");
        }

        store
            .save(&producto)
            .await
            .with_context(|| format!("could not save producto {}", self.id))?;

        info!("updated producto {}", producto.id);
        print_productos(&[producto]);
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.database.verbose
    }
}

/// Removes a producto from the catalog
#[derive(Parser)]
pub struct Delete {
    pub id: i64,
    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[async_trait]
impl Runnable for Delete {
    async fn run(&mut self) -> Result<()> {
        let store = self.database.store().await?;
        store.delete(self.id).await?;

        info!("deleted producto {}", self.id);
        Ok(())
    }

    fn is_verbose(&self) -> bool {
        self.database.verbose
    }
}

fn print_productos(productos: &[Producto]) {
    if productos.is_empty() {
        println!("{}", "no productos".italic());
        return;
    }

    println!(
        "{}",
        format!("{:>6}  {:<50}  {:>10}  {}", "id", "nombre", "precio", "disponible")
            .as_str()
            .bold()
    );
    for producto in productos {
        println!("{}", format_row(producto));
    }
}

fn format_row(producto: &Producto) -> String {
    format!(
        "{:>6}  {:<50}  {:>10}  {}",
        producto.id,
        producto.nombre,
        producto.precio,
        if producto.disponible { "sí" } else { "no" }
    )
}
