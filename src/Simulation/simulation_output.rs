//! Terminal summaries of a simulation.
use super::porous_media_lab::PorousMediaLab;
use prettytable::{Table, row};

impl PorousMediaLab {
    /// one row per species: D, initial and inlet values, final min/mean/max
    pub fn species_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row![
            "Species", "D", "C(x, 0)", "C(0, t)", "min", "mean", "max"
        ]);
        for species in self.species_registry().iter() {
            let last = species.final_profile();
            table.add_row(row![
                species.name(),
                format!("{:.3e}", species.diffusion_coefficient()),
                range_label(species.initial_condition().iter()),
                range_label(species.boundary_condition().iter()),
                format!("{:.4e}", last.min()),
                format!("{:.4e}", last.mean()),
                format!("{:.4e}", last.max()),
            ]);
        }
        table
    }

    /// dcdt per species, rate laws and coefficients
    pub fn reaction_table(&self) -> Table {
        let reactions = self.reactions();
        let mut table = Table::new();
        table.add_row(row!["Kind", "Name", "Definition"]);
        for name in self.species_registry().names() {
            table.add_row(row!["dcdt", name, reactions.dcdt(&name)]);
        }
        for (name, expression) in reactions.rates() {
            table.add_row(row!["rate", name, expression]);
        }
        for (name, value) in reactions.coefficients() {
            table.add_row(row!["coefficient", name, format!("{:e}", value)]);
        }
        table
    }

    pub fn pretty_print(&self) {
        let grid = self.grid();
        let mut table = Table::new();
        table.add_row(row!["Parameter", "Value"]);
        table.add_row(row!["L", format!("{}", grid.length())]);
        table.add_row(row!["dx", format!("{}", grid.dx())]);
        table.add_row(row!["t", format!("{}", grid.duration())]);
        table.add_row(row!["dt", format!("{}", grid.dt())]);
        table.add_row(row!["phi", format!("{}", grid.phi())]);
        table.add_row(row!["w", format!("{}", grid.w())]);
        table.add_row(row!["nodes", format!("{}", grid.num_nodes())]);
        table.add_row(row!["time levels", format!("{}", grid.num_steps())]);
        table.printstd();
        self.species_table().printstd();
        self.reaction_table().printstd();
    }
}

/// a single value when constant, `first..last` otherwise
fn range_label<'a>(mut values: impl Iterator<Item = &'a f64>) -> String {
    let Some(&first) = values.next() else {
        return String::new();
    };
    let mut last = first;
    let mut constant = true;
    for &v in values {
        constant &= v == first;
        last = v;
    }
    if constant {
        format!("{}", first)
    } else {
        format!("{}..{}", first, last)
    }
}
