use serde::{Deserialize, Serialize};

macro_rules! periodic_table {
    ($($sym:ident = $num:literal => $weight:literal),+ $(,)?) => {
        /// Chemical elements 1–118.
        ///
        /// Serialized by symbol (`"C"`, `"Cl"`), which is also the notation
        /// z-matrix text formats use.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum Element {
            $($sym = $num),+
        }

        // (element, symbol, standard atomic weight), indexed by atomic number - 1
        static ELEMENTS: [(Element, &str, f64); 118] = [
            $((Element::$sym, stringify!($sym), $weight)),+
        ];
    };
}

// IUPAC CIAAW 2021 standard atomic weights. Radioactive elements without
// stable isotopes carry the mass number of their longest-lived isotope.
periodic_table! {
    H = 1 => 1.008, He = 2 => 4.002602, Li = 3 => 6.941, Be = 4 => 9.0121831,
    B = 5 => 10.81, C = 6 => 12.011, N = 7 => 14.007, O = 8 => 15.999,
    F = 9 => 18.998403163, Ne = 10 => 20.1797, Na = 11 => 22.98976928, Mg = 12 => 24.305,
    Al = 13 => 26.9815384, Si = 14 => 28.085, P = 15 => 30.973761998, S = 16 => 32.06,
    Cl = 17 => 35.45, Ar = 18 => 39.948, K = 19 => 39.0983, Ca = 20 => 40.078,
    Sc = 21 => 44.955908, Ti = 22 => 47.867, V = 23 => 50.9415, Cr = 24 => 51.9961,
    Mn = 25 => 54.938043, Fe = 26 => 55.845, Co = 27 => 58.933194, Ni = 28 => 58.6934,
    Cu = 29 => 63.546, Zn = 30 => 65.38, Ga = 31 => 69.723, Ge = 32 => 72.630,
    As = 33 => 74.921595, Se = 34 => 78.971, Br = 35 => 79.904, Kr = 36 => 83.798,
    Rb = 37 => 85.4678, Sr = 38 => 87.62, Y = 39 => 88.90584, Zr = 40 => 91.224,
    Nb = 41 => 92.90637, Mo = 42 => 95.95, Tc = 43 => 97.0, Ru = 44 => 101.07,
    Rh = 45 => 102.90549, Pd = 46 => 106.42, Ag = 47 => 107.8682, Cd = 48 => 112.414,
    In = 49 => 114.818, Sn = 50 => 118.710, Sb = 51 => 121.760, Te = 52 => 127.60,
    I = 53 => 126.90447, Xe = 54 => 131.293, Cs = 55 => 132.90545196, Ba = 56 => 137.327,
    La = 57 => 138.90547, Ce = 58 => 140.116, Pr = 59 => 140.90766, Nd = 60 => 144.242,
    Pm = 61 => 145.0, Sm = 62 => 150.36, Eu = 63 => 151.964, Gd = 64 => 157.25,
    Tb = 65 => 158.925354, Dy = 66 => 162.500, Ho = 67 => 164.930328, Er = 68 => 167.259,
    Tm = 69 => 168.934218, Yb = 70 => 173.045, Lu = 71 => 174.9668, Hf = 72 => 178.486,
    Ta = 73 => 180.94788, W = 74 => 183.84, Re = 75 => 186.207, Os = 76 => 190.23,
    Ir = 77 => 192.217, Pt = 78 => 195.084, Au = 79 => 196.966570, Hg = 80 => 200.592,
    Tl = 81 => 204.38, Pb = 82 => 207.2, Bi = 83 => 208.98040, Po = 84 => 209.0,
    At = 85 => 210.0, Rn = 86 => 222.0, Fr = 87 => 223.0, Ra = 88 => 226.0,
    Ac = 89 => 227.0, Th = 90 => 232.0377, Pa = 91 => 231.03588, U = 92 => 238.02891,
    Np = 93 => 237.0, Pu = 94 => 244.0, Am = 95 => 243.0, Cm = 96 => 247.0,
    Bk = 97 => 247.0, Cf = 98 => 251.0, Es = 99 => 252.0, Fm = 100 => 257.0,
    Md = 101 => 258.0, No = 102 => 259.0, Lr = 103 => 266.0, Rf = 104 => 267.0,
    Db = 105 => 268.0, Sg = 106 => 269.0, Bh = 107 => 270.0, Hs = 108 => 277.0,
    Mt = 109 => 278.0, Ds = 110 => 281.0, Rg = 111 => 282.0, Cn = 112 => 285.0,
    Nh = 113 => 286.0, Fl = 114 => 289.0, Mc = 115 => 290.0, Lv = 116 => 293.0,
    Ts = 117 => 294.0, Og = 118 => 294.0,
}

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        let idx = usize::from(n).checked_sub(1)?;
        ELEMENTS.get(idx).map(|(e, _, _)| *e)
    }

    /// Looks up an element by its exact symbol (`"Cl"`, not `"CL"`).
    pub fn from_symbol(s: &str) -> Option<Element> {
        ELEMENTS
            .iter()
            .find(|(_, sym, _)| *sym == s)
            .map(|(e, _, _)| *e)
    }

    /// Looks up an element after normalizing case, so `"cl"`, `"CL"` and
    /// `"Cl"` all give chlorine. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Element> {
        let s = s.trim();
        let mut chars = s.chars();
        let first = chars.next()?;
        let normalized: String = first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect();
        Self::from_symbol(&normalized)
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        ELEMENTS[self as usize - 1].1
    }

    pub fn atomic_weight(self) -> f64 {
        ELEMENTS[self as usize - 1].2
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
