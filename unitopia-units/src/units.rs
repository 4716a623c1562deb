//! Unit definitions, organized by category in picker order

use std::collections::HashMap;
use std::sync::LazyLock;
use unitopia_core::{Category, ConversionError};
use crate::Unit;

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of all selectable units
///
/// Each category keeps its units in display order. The first two are the
/// default source and target whenever the category becomes active.
pub struct UnitRegistry {
    /// Indexed by `Category::index()`
    units: Vec<Vec<Unit>>,
    /// Exact-case symbols -> (category index, unit index)
    symbols: HashMap<&'static str, (usize, usize)>,
    /// Lowercased keys, names, and aliases -> (category index, unit index)
    aliases: HashMap<String, (usize, usize)>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = UnitRegistry {
            units: Category::ALL.iter().map(|_| Vec::new()).collect(),
            symbols: HashMap::new(),
            aliases: HashMap::new(),
        };
        registry.register_all_units();
        registry
    }

    /// All categories in picker order
    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }

    /// Ordered units of a category
    pub fn units_for(&self, category: Category) -> &[Unit] {
        &self.units[category.index()]
    }

    /// Default (source, target) pair of a category
    pub fn default_pair(&self, category: Category) -> (&Unit, &Unit) {
        let units = self.units_for(category);
        (&units[0], &units[1])
    }

    /// Canonical base unit of a category
    pub fn base_unit(&self, category: Category) -> Option<&Unit> {
        self.units_for(category)
            .iter()
            .find(|u| u.key == category.base_unit_key())
    }

    /// Get a unit by key, symbol, or alias
    ///
    /// Symbols match exactly ("mL", "K"); everything else is case-insensitive.
    pub fn get(&self, name: &str) -> Option<&Unit> {
        let name = name.trim();
        let slot = self.symbols.get(name)
            .or_else(|| self.aliases.get(&name.to_lowercase()))?;
        self.units.get(slot.0).and_then(|units| units.get(slot.1))
    }

    /// Check whether the registry holds exactly this unit
    pub fn contains(&self, unit: &Unit) -> bool {
        self.units_for(unit.category).iter().any(|u| u.key == unit.key)
    }

    /// Iterate over every unit, category by category
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.units.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert an amount between two units of the same category
    pub fn convert(&self, amount: f64, source: &Unit, target: &Unit) -> Result<f64, ConversionError> {
        source.convert_to(amount, target)
    }

    fn register(&mut self, unit: Unit) {
        let cat = unit.category.index();
        let slot = (cat, self.units[cat].len());

        self.symbols.insert(unit.symbol, slot);
        for name in [unit.key, unit.symbol, unit.name, unit.plural] {
            self.aliases.entry(name.to_lowercase()).or_insert(slot);
        }
        self.units[cat].push(unit);
    }

    fn alias(&mut self, alias: &str, key: &str) {
        if let Some(&slot) = self.aliases.get(key) {
            self.aliases.insert(alias.to_lowercase(), slot);
        }
    }

    fn register_all_units(&mut self) {
        self.register_temperature_units();
        self.register_length_units();
        self.register_mass_units();
        self.register_duration_units();
        self.register_speed_units();
        self.register_volume_units();
    }

    fn register_temperature_units(&mut self) {
        use Category::Temperature as T;
        // base: kelvin
        self.register(Unit::with_offset("fahrenheit", "°F", "degree Fahrenheit", "degrees Fahrenheit", T, 5.0 / 9.0, 459.67));
        self.register(Unit::with_offset("celsius", "°C", "degree Celsius", "degrees Celsius", T, 1.0, 273.15));
        self.register(Unit::new("kelvin", "K", "kelvin", "kelvins", T, 1.0));

        self.alias("f", "fahrenheit");
        self.alias("degf", "fahrenheit");
        self.alias("c", "celsius");
        self.alias("degc", "celsius");
        self.alias("centigrade", "celsius");
    }

    fn register_length_units(&mut self) {
        use Category::Length as L;
        // base: meter
        self.register(Unit::new("inches", "in", "inch", "inches", L, 0.0254));
        self.register(Unit::new("feet", "ft", "foot", "feet", L, 0.3048));
        self.register(Unit::new("meters", "m", "meter", "meters", L, 1.0));
        self.register(Unit::new("centimeters", "cm", "centimeter", "centimeters", L, 0.01));
        self.register(Unit::new("miles", "mi", "mile", "miles", L, 1609.344));
        self.register(Unit::new("kilometers", "km", "kilometer", "kilometers", L, 1000.0));

        self.alias("\"", "inches");
        self.alias("'", "feet");
        self.alias("metre", "meters");
        self.alias("metres", "meters");
        self.alias("centimetre", "centimeters");
        self.alias("centimetres", "centimeters");
        self.alias("kilometre", "kilometers");
        self.alias("kilometres", "kilometers");
    }

    fn register_mass_units(&mut self) {
        use Category::Mass as M;
        // base: kilogram
        self.register(Unit::new("grams", "g", "gram", "grams", M, 0.001));
        self.register(Unit::new("kilograms", "kg", "kilogram", "kilograms", M, 1.0));
        self.register(Unit::new("pounds", "lb", "pound", "pounds", M, 0.45359237));
        self.register(Unit::new("ounces", "oz", "ounce", "ounces", M, 0.028349523125));

        self.alias("lbs", "pounds");
        self.alias("kgs", "kilograms");
    }

    fn register_duration_units(&mut self) {
        use Category::Duration as D;
        // base: second
        self.register(Unit::new("hours", "hr", "hour", "hours", D, 3600.0));
        self.register(Unit::new("minutes", "min", "minute", "minutes", D, 60.0));
        self.register(Unit::new("seconds", "s", "second", "seconds", D, 1.0));
        self.register(Unit::new("milliseconds", "ms", "millisecond", "milliseconds", D, 0.001));

        self.alias("h", "hours");
        self.alias("hrs", "hours");
        self.alias("mins", "minutes");
        self.alias("sec", "seconds");
        self.alias("secs", "seconds");
    }

    fn register_speed_units(&mut self) {
        use Category::Speed as S;
        // base: meters per second
        self.register(Unit::new("miles_per_hour", "mph", "mile per hour", "miles per hour", S, 0.44704));
        self.register(Unit::new("kilometers_per_hour", "km/h", "kilometer per hour", "kilometers per hour", S, 1000.0 / 3600.0));
        self.register(Unit::new("meters_per_second", "m/s", "meter per second", "meters per second", S, 1.0));

        self.alias("kph", "kilometers_per_hour");
        self.alias("kmh", "kilometers_per_hour");
        self.alias("mps", "meters_per_second");
    }

    fn register_volume_units(&mut self) {
        use Category::Volume as V;
        // base: liter; US customary definitions
        self.register(Unit::new("liters", "L", "liter", "liters", V, 1.0));
        self.register(Unit::new("gallons", "gal", "gallon", "gallons", V, 3.785411784));
        self.register(Unit::new("acre_feet", "af", "acre-foot", "acre-feet", V, 1233481.83754752));
        self.register(Unit::new("bushels", "bsh", "bushel", "bushels", V, 35.23907016688));
        self.register(Unit::new("pints", "pt", "pint", "pints", V, 0.473176473));
        self.register(Unit::new("quarts", "qt", "quart", "quarts", V, 0.946352946));
        self.register(Unit::new("fluid_ounces", "fl oz", "fluid ounce", "fluid ounces", V, 0.0295735295625));
        self.register(Unit::new("centiliters", "cL", "centiliter", "centiliters", V, 0.01));
        self.register(Unit::new("milliliters", "mL", "milliliter", "milliliters", V, 0.001));
        // US legal cup (nutrition labeling)
        self.register(Unit::new("cups", "cup", "cup", "cups", V, 0.24));

        self.alias("litre", "liters");
        self.alias("litres", "liters");
        self.alias("floz", "fluid_ounces");
        self.alias("acre feet", "acre_feet");
        self.alias("millilitre", "milliliters");
        self.alias("millilitres", "milliliters");
        self.alias("centilitre", "centiliters");
        self.alias("centilitres", "centiliters");
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
