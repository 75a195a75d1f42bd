use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tracing::debug;

use super::render::render_outline;
use crate::index::{Criteria, ListingTree};
use crate::types::Listing;

const MAIN_MENU: &str = "\
1) Insert listing
2) Delete by metric
3) Find by metric
4) Search by criteria
5) Show tree
6) Quit
";

const RELATION_MENU: &str = "\
a) Level
b) Balance factor
c) Parent
d) Grandparent
e) Sibling
f) Uncle
g) Back
";

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Menu-driven session over a [`ListingTree`].
///
/// Reads answers line by line from `input` and writes prompts and results to
/// `output`. End of input ends the session like the quit option does.
pub struct Shell<R, W> {
    tree: ListingTree,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Starts a session over an already populated tree.
    pub fn new(tree: ListingTree, input: R, output: W) -> Self {
        Self {
            tree,
            input,
            output,
        }
    }

    /// The tree as modified so far.
    pub fn tree(&self) -> &ListingTree {
        &self.tree
    }

    /// Ends the session, handing back the tree.
    pub fn into_tree(self) -> ListingTree {
        self.tree
    }

    /// Runs the main menu until quit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "\n{MAIN_MENU}")?;
            let Some(choice) = self.prompt_line("> ")? else {
                break;
            };
            debug!(choice = choice.as_str(), "shell.command");
            let flow = match choice.as_str() {
                "1" => self.insert()?,
                "2" => self.delete()?,
                "3" => self.find()?,
                "4" => self.search()?,
                "5" => self.show()?,
                "6" => Flow::Quit,
                other => {
                    writeln!(self.output, "unknown option '{other}'")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }
        self.output.flush()
    }

    fn insert(&mut self) -> io::Result<Flow> {
        let Some(city) = self.prompt_text("city: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(price) = self.prompt_number::<f64>("price: ", None)? else {
            return Ok(Flow::Quit);
        };
        let Some(surface) = self.prompt_number::<f64>("surface_total: ", None)? else {
            return Ok(Flow::Quit);
        };
        let Some(bedrooms) = self.prompt_number::<u32>("bedrooms: ", None)? else {
            return Ok(Flow::Quit);
        };
        let Some(bathrooms) = self.prompt_number::<u32>("bathrooms: ", None)? else {
            return Ok(Flow::Quit);
        };

        let listing = Listing::new(city, price, surface, bedrooms, bathrooms);
        match self.tree.insert(listing) {
            Ok(key) => {
                writeln!(self.output, "inserted with metric {key}")?;
                self.print_tree()?;
            }
            Err(err) => writeln!(self.output, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        let Some(key) = self.prompt_number::<f64>("metric: ", None)? else {
            return Ok(Flow::Quit);
        };
        match self.tree.delete_by_metric(key) {
            Some(record) => {
                writeln!(self.output, "removed {record}")?;
                self.print_tree()?;
            }
            None => writeln!(self.output, "no listing with metric {key}")?,
        }
        Ok(Flow::Continue)
    }

    fn find(&mut self) -> io::Result<Flow> {
        let Some(key) = self.prompt_number::<f64>("metric: ", None)? else {
            return Ok(Flow::Quit);
        };
        match self.tree.find_by_metric(key) {
            Some(record) => writeln!(self.output, "{key}, {record}")?,
            None => writeln!(self.output, "no listing with metric {key}")?,
        }
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        let Some(city) = self.prompt_line("city (blank for any): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(min_bedrooms) = self.prompt_number::<u32>("minimum bedrooms: ", Some(0))? else {
            return Ok(Flow::Quit);
        };
        let Some(max_price) =
            self.prompt_number::<f64>("maximum price: ", Some(f64::INFINITY))?
        else {
            return Ok(Flow::Quit);
        };
        let Some(min_metric) =
            self.prompt_number::<f64>("minimum metric: ", Some(f64::NEG_INFINITY))?
        else {
            return Ok(Flow::Quit);
        };
        let Some(max_metric) =
            self.prompt_number::<f64>("maximum metric: ", Some(f64::INFINITY))?
        else {
            return Ok(Flow::Quit);
        };

        let mut criteria = Criteria::default().metric_range(min_metric, max_metric);
        if !city.is_empty() {
            criteria = criteria.city(city);
        }
        if min_bedrooms > 0 {
            criteria = criteria.min_bedrooms(min_bedrooms);
        }
        if max_price.is_finite() {
            criteria = criteria.max_price(max_price);
        }

        let matches = self.tree.find_entries_by_criteria(&criteria);
        writeln!(self.output, "{} match(es)", matches.len())?;
        for (key, record) in matches {
            writeln!(self.output, "{key}, {record}")?;
        }
        Ok(Flow::Continue)
    }

    fn show(&mut self) -> io::Result<Flow> {
        self.print_tree()?;
        loop {
            write!(self.output, "\n{RELATION_MENU}")?;
            let Some(choice) = self.prompt_line("> ")? else {
                return Ok(Flow::Quit);
            };
            if choice == "g" {
                return Ok(Flow::Continue);
            }
            if !matches!(choice.as_str(), "a" | "b" | "c" | "d" | "e" | "f") {
                writeln!(self.output, "unknown option '{choice}'")?;
                continue;
            }
            let Some(key) = self.prompt_number::<f64>("metric: ", None)? else {
                return Ok(Flow::Quit);
            };
            self.relation(&choice, key)?;
        }
    }

    fn relation(&mut self, choice: &str, key: f64) -> io::Result<()> {
        let tree = &self.tree;
        let out = &mut self.output;
        match choice {
            "a" => match tree.level_of(key) {
                Some(level) => writeln!(out, "level {level}"),
                None => writeln!(out, "no listing with metric {key}"),
            },
            "b" => match tree.balance_factor_of(key) {
                Some(balance) => writeln!(out, "balance factor {balance}"),
                None => writeln!(out, "no listing with metric {key}"),
            },
            _ => {
                let (name, found) = match choice {
                    "c" => ("parent", tree.parent_of(key)),
                    "d" => ("grandparent", tree.grandparent_of(key)),
                    "e" => ("sibling", tree.sibling_of(key)),
                    _ => ("uncle", tree.uncle_of(key)),
                };
                match found {
                    Some(record) => writeln!(out, "{name}: {record}"),
                    None => writeln!(out, "no {name}"),
                }
            }
        }
    }

    fn print_tree(&mut self) -> io::Result<()> {
        match self.tree.project() {
            Some(root) => write!(self.output, "{}", render_outline(&root)),
            None => writeln!(self.output, "(empty tree)"),
        }
    }

    /// One trimmed line; `None` at end of input.
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            if !line.is_empty() {
                return Ok(Some(line));
            }
            writeln!(self.output, "a value is required")?;
        }
    }

    /// Re-prompts until the answer parses. A blank answer takes `default`
    /// when there is one.
    fn prompt_number<T: FromStr>(
        &mut self,
        prompt: &str,
        default: Option<T>,
    ) -> io::Result<Option<T>> {
        let mut default = default;
        loop {
            let Some(line) = self.prompt_line(prompt)? else {
                return Ok(None);
            };
            if line.is_empty() {
                if let Some(value) = default.take() {
                    return Ok(Some(value));
                }
                writeln!(self.output, "a value is required")?;
                continue;
            }
            match line.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "'{line}' is not a valid number, try again")?,
            }
        }
    }
}
