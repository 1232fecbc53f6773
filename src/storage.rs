use crate::{Field2, Grid2};

pub const SLOT_COUNT: usize = 12;

/// Logical names for the simulation buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    PrevU,
    U,
    PrevV,
    V,
    PrevDensity,
    Density,
    InputU,
    InputV,
    InputDensity,
    Divergence,
    Pressure,
    PressureScratch,
}

impl Role {
    pub const ALL: [Role; SLOT_COUNT] = [
        Role::PrevU,
        Role::U,
        Role::PrevV,
        Role::V,
        Role::PrevDensity,
        Role::Density,
        Role::InputU,
        Role::InputV,
        Role::InputDensity,
        Role::Divergence,
        Role::Pressure,
        Role::PressureScratch,
    ];

    fn ordinal(self) -> usize {
        self as usize
    }
}

/// Index of a physical buffer in [`GridStorage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot(usize);

impl Slot {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Maps each [`Role`] to the physical buffer currently playing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleTable {
    slots: [Slot; SLOT_COUNT],
}

impl Default for RoleTable {
    fn default() -> Self {
        Self {
            slots: std::array::from_fn(Slot),
        }
    }
}

impl RoleTable {
    pub fn slot(&self, role: Role) -> Slot {
        self.slots[role.ordinal()]
    }

    pub fn swap(&mut self, a: Role, b: Role) {
        self.slots.swap(a.ordinal(), b.ordinal());
    }

    pub fn swap_velocity(&mut self) {
        self.swap(Role::U, Role::PrevU);
        self.swap(Role::V, Role::PrevV);
    }

    pub fn swap_density(&mut self) {
        self.swap(Role::Density, Role::PrevDensity);
    }
}

/// Mutable views of the three injected source fields.
pub struct Sources<'a> {
    pub u: &'a mut Field2,
    pub v: &'a mut Field2,
    pub density: &'a mut Field2,
}

impl Sources<'_> {
    pub fn clear(&mut self) {
        self.u.fill(0.0);
        self.v.fill(0.0);
        self.density.fill(0.0);
    }
}

/// Read access to every buffer except the one lent out mutably.
pub struct SlotsExcept<'a> {
    before: &'a [Field2],
    after: &'a [Field2],
    held: usize,
}

impl<'a> SlotsExcept<'a> {
    pub fn get(&self, slot: Slot) -> &'a Field2 {
        let index = slot.index();
        assert_ne!(index, self.held, "slot {index} is borrowed mutably");
        if index < self.held {
            &self.before[index]
        } else {
            &self.after[index - self.held - 1]
        }
    }
}

/// Fixed bank of equally sized padded fields.
#[derive(Clone, Debug)]
pub struct GridStorage {
    grid: Grid2,
    fields: [Field2; SLOT_COUNT],
}

impl GridStorage {
    pub fn new(grid: Grid2) -> Self {
        Self {
            grid,
            fields: std::array::from_fn(|_| Field2::new(grid, 0.0)),
        }
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        self.grid.idx(i, j)
    }

    pub fn field(&self, slot: Slot) -> &Field2 {
        &self.fields[slot.index()]
    }

    pub fn field_mut(&mut self, slot: Slot) -> &mut Field2 {
        &mut self.fields[slot.index()]
    }

    pub fn get(&self, slot: Slot, i: usize, j: usize) -> f32 {
        self.fields[slot.index()].get(i, j)
    }

    pub fn set(&mut self, slot: Slot, i: usize, j: usize, value: f32) {
        self.fields[slot.index()].set(i, j, value);
    }

    pub fn zero(&mut self, slot: Slot) {
        self.fields[slot.index()].fill(0.0);
    }

    pub fn copy(&mut self, src: Slot, dst: Slot) {
        if src == dst {
            return;
        }
        let (out, others) = self.split_out(dst);
        out.copy_from(others.get(src));
    }

    /// Lends `write` mutably alongside shared access to every other slot.
    pub fn split_out(&mut self, write: Slot) -> (&mut Field2, SlotsExcept<'_>) {
        let held = write.index();
        let (before, rest) = self.fields.split_at_mut(held);
        let (out, after) = rest.split_first_mut().expect("slot index in range");
        let others = SlotsExcept {
            before,
            after,
            held,
        };
        (out, others)
    }

    pub fn sources_mut(&mut self, roles: &RoleTable) -> Sources<'_> {
        let u = roles.slot(Role::InputU).index();
        let v = roles.slot(Role::InputV).index();
        let density = roles.slot(Role::InputDensity).index();
        let mut u_field = None;
        let mut v_field = None;
        let mut density_field = None;
        for (index, field) in self.fields.iter_mut().enumerate() {
            if index == u {
                u_field = Some(field);
            } else if index == v {
                v_field = Some(field);
            } else if index == density {
                density_field = Some(field);
            }
        }
        match (u_field, v_field, density_field) {
            (Some(u), Some(v), Some(density)) => Sources { u, v, density },
            _ => unreachable!("source roles map to distinct slots"),
        }
    }
}
