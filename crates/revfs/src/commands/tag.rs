use clap::Args;

use crate::config::open_store;

#[derive(Args)]
pub struct TagArgs {
    /// Tag name (omit to list tags)
    name: Option<String>,
    /// Revision to tag
    #[arg(default_value = "HEAD")]
    revision: String,
    /// Move an existing tag
    #[arg(short, long)]
    force: bool,
    /// Delete the tag instead of creating it
    #[arg(short, long, conflicts_with = "force")]
    delete: bool,
}

pub fn run(args: TagArgs) -> anyhow::Result<()> {
    let store = open_store()?;

    let Some(name) = args.name else {
        for (ref_name, id) in store.list_refs("tags")? {
            let short = ref_name.strip_prefix("tags/").unwrap_or(&ref_name);
            println!("{short:<24} {}", id.short_hex());
        }
        return Ok(());
    };
    let ref_name = format!("tags/{name}");

    if args.delete {
        if store.get_ref(&ref_name)?.is_none() {
            anyhow::bail!("tag '{name}' not found");
        }
        store.delete_ref(&ref_name)?;
        println!("Deleted tag {name}");
        return Ok(());
    }

    let target = store.resolve_revision(&args.revision)?;
    if let Some(existing) = store.get_ref(&ref_name)? {
        if existing != target && !args.force {
            anyhow::bail!("tag '{name}' already exists (use --force to move it)");
        }
    }
    store.set_ref(&ref_name, &target)?;

    println!("Tagged {} as {name}", target.short_hex());
    Ok(())
}
