/// Column holding the reading timestamp
pub(crate) const TIMESTAMP_COLUMN: &str = "Data/Hora";

/// Column holding the energy consumed in the reading interval
pub(crate) const CONSUMPTION_COLUMN: &str = "Consumo em kWh";

/// Column holding the billed cost of the reading interval
pub(crate) const COST_COLUMN: &str = "Custo Total";

pub(crate) const REQUIRED_COLUMNS: [&str; 3] = [TIMESTAMP_COLUMN, CONSUMPTION_COLUMN, COST_COLUMN];

/// Currency symbol shown in front of costs unless configured otherwise
pub(crate) const DEFAULT_CURRENCY: &str = "R$";
