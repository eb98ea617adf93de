use crate::catalog::Seed;

/// Default number of soil slots on the board
pub const DEFAULT_SOIL_COUNT: usize = 5;

/// One board slot. Holds at most one planted seed plus persistent modifiers.
///
/// Planting state is cleared between rounds; modifier flags and the
/// multiplier are not.
#[derive(Debug, Clone, PartialEq)]
pub struct Soil {
    /// Seed currently growing here, if any
    planted_seed: Option<Seed>,
    /// Multiplicative modifier, accumulates across upgrades
    pub multiplier: f64,
    /// Multiplier applied to the seed's base value
    pub flat_bonus: f64,
    pub is_upgraded: bool,
    pub is_evil: bool,
    pub is_clover: bool,
    pub is_holy: bool,
    /// Presentation hint set by upgrades; ignored by scoring
    pub upgraded_color: Option<String>,
}

impl Default for Soil {
    fn default() -> Self {
        Self {
            planted_seed: None,
            multiplier: 1.0,
            flat_bonus: 1.0,
            is_upgraded: false,
            is_evil: false,
            is_clover: false,
            is_holy: false,
            upgraded_color: None,
        }
    }
}

impl Soil {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_planted(&self) -> bool {
        self.planted_seed.is_some()
    }

    pub fn planted_seed(&self) -> Option<&Seed> {
        self.planted_seed.as_ref()
    }

    /// Plants `seed`, handing it back if the soil is occupied.
    pub fn plant(&mut self, seed: Seed) -> Result<(), Seed> {
        if self.planted_seed.is_some() {
            return Err(seed);
        }
        self.planted_seed = Some(seed);
        Ok(())
    }

    /// Removes and returns the planted seed.
    pub fn take_seed(&mut self) -> Option<Seed> {
        self.planted_seed.take()
    }

    /// Clears planting state only.
    pub fn reset(&mut self) {
        self.planted_seed = None;
    }

    /// Drops every modifier flag. The multiplier is left as is.
    pub fn clear_flags(&mut self) {
        self.is_upgraded = false;
        self.is_evil = false;
        self.is_clover = false;
        self.is_holy = false;
        self.upgraded_color = None;
    }
}

/// Ordered row of soil slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    soils: Vec<Soil>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SOIL_COUNT)
    }
}

impl Board {
    pub fn new(count: usize) -> Self {
        Self {
            soils: (0..count).map(|_| Soil::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.soils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soils.is_empty()
    }

    pub fn soil(&self, index: usize) -> Option<&Soil> {
        self.soils.get(index)
    }

    pub fn soil_mut(&mut self, index: usize) -> Option<&mut Soil> {
        self.soils.get_mut(index)
    }

    pub fn soils(&self) -> &[Soil] {
        &self.soils
    }

    pub fn soils_mut(&mut self) -> &mut [Soil] {
        &mut self.soils
    }

    /// Plants on `index`. A no-op returning `false` when the soil is
    /// occupied or does not exist; the rejected seed is dropped here, so
    /// callers that need it back use [`Board::try_plant`].
    pub fn plant(&mut self, index: usize, seed: Seed) -> bool {
        self.try_plant(index, seed).is_ok()
    }

    /// Like [`Board::plant`] but hands the seed back on failure.
    pub fn try_plant(&mut self, index: usize, seed: Seed) -> Result<(), Seed> {
        match self.soils.get_mut(index) {
            Some(soil) => soil.plant(seed),
            None => Err(seed),
        }
    }

    pub fn take_seed(&mut self, index: usize) -> Option<Seed> {
        self.soils.get_mut(index).and_then(Soil::take_seed)
    }

    pub fn reset(&mut self, index: usize) {
        if let Some(soil) = self.soils.get_mut(index) {
            soil.reset();
        }
    }

    pub fn reset_all_planting(&mut self) {
        for soil in &mut self.soils {
            soil.reset();
        }
    }

    /// Indices of planted soils in board order.
    pub fn planted_indices(&self) -> Vec<usize> {
        self.soils
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_planted())
            .map(|(i, _)| i)
            .collect()
    }
}
