use crate::abi::{string_type, ty_any, InterfaceType, Type};
use crate::TypeAssertionError;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Dispatch table binding an interface type to a concrete type.
#[derive(Debug)]
pub struct Itab {
    inter: Arc<InterfaceType>,
    ty: Arc<Type>,
    hash: u32,
    fun: Box<[usize]>,
}

impl Itab {
    fn new(inter: Arc<InterfaceType>, ty: Arc<Type>) -> Self {
        // Method slots stay zero until method dispatch is generated; "any" keeps a single slot.
        let slots = inter.methods.len().max(1);
        Self {
            hash: ty.hash,
            fun: vec![0; slots].into_boxed_slice(),
            inter,
            ty,
        }
    }

    pub fn inter(&self) -> &Arc<InterfaceType> {
        &self.inter
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn fun(&self) -> &[usize] {
        &self.fun
    }
}

type ItabKey = (usize, usize);

static ITABS: Lazy<Mutex<HashMap<ItabKey, Weak<Itab>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Shared itab for an `(interface, concrete type)` pair.
///
/// The table only holds weak references. A live itab keeps both descriptors
/// alive, so the address pair keying a live entry cannot be reused by another
/// descriptor. Once every interface value using an itab is dropped, its
/// descriptors are released and the entry is pruned on a later miss.
pub fn itab(inter: &Arc<InterfaceType>, ty: &Arc<Type>) -> Arc<Itab> {
    let key = (Arc::as_ptr(inter) as usize, Arc::as_ptr(ty) as usize);
    let mut table = ITABS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(tab) = table.get(&key).and_then(Weak::upgrade) {
        return tab;
    }
    table.retain(|_, tab| tab.strong_count() > 0);
    let tab = Arc::new(Itab::new(inter.clone(), ty.clone()));
    table.insert(key, Arc::downgrade(&tab));
    tab
}

/// `{ptr, len}` header of a string, the layout a lowered string has.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct StringHeader<'a> {
    ptr: *const u8,
    len: usize,
    _marker: PhantomData<&'a str>,
}

impl<'a> StringHeader<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            ptr: s.as_ptr(),
            len: s.len(),
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_str(&self) -> &'a str {
        // SAFETY: the header was built from a `&'a str` and is immutable.
        unsafe { std::str::from_utf8_unchecked(std::slice::from_raw_parts(self.ptr, self.len)) }
    }
}

impl<'a> From<&'a str> for StringHeader<'a> {
    fn from(s: &'a str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for StringHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StringHeader").field(&self.as_str()).finish()
    }
}

/// Boxed interface value: `{tab, data}`.
///
/// `data` holds either raw scalar bits or a pointer into storage owned by the
/// caller. This crate never dereferences it.
#[repr(C)]
#[derive(Clone)]
pub struct Interface<'a> {
    tab: Arc<Itab>,
    data: *const (),
    _marker: PhantomData<&'a ()>,
}

// SAFETY: `data` is an opaque word here; nothing in this crate reads through it.
unsafe impl Send for Interface<'_> {}
unsafe impl Sync for Interface<'_> {}

impl<'a> Interface<'a> {
    fn new(tab: Arc<Itab>, data: *const ()) -> Self {
        Self {
            tab,
            data,
            _marker: PhantomData,
        }
    }

    pub fn itab(&self) -> &Itab {
        &self.tab
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.tab.ty
    }

    pub fn data(&self) -> *const () {
        self.data
    }

    pub fn is_any(&self) -> bool {
        self.tab.inter.is_empty()
    }
}

impl fmt::Debug for Interface<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("inter", &self.tab.inter.to_string())
            .field("ty", &self.tab.ty.name)
            .field("data", &self.data)
            .finish()
    }
}

/// Box a scalar; `word` is stored as pointer-width bits, not an address.
pub fn box_scalar(ty: &Arc<Type>, word: usize) -> Interface<'static> {
    Interface::new(itab(&ty_any(), ty), word as *const ())
}

/// Box a string by borrowing its header.
pub fn box_string<'a>(header: &'a StringHeader<'_>) -> Interface<'a> {
    let data = header as *const StringHeader<'_> as *const ();
    Interface::new(itab(&ty_any(), &string_type()), data)
}

/// Box an arbitrary value; the caller keeps `data` valid for as long as the
/// interface is used.
pub fn box_any(ty: &Arc<Type>, data: *const ()) -> Interface<'static> {
    Interface::new(itab(&ty_any(), ty), data)
}

pub fn make_interface(
    inter: &Arc<InterfaceType>,
    ty: &Arc<Type>,
    data: *const (),
) -> Interface<'static> {
    Interface::new(itab(inter, ty), data)
}

/// Unbox a word, panicking when `v` does not hold exactly `ty`.
#[track_caller]
pub fn assert_int(v: &Interface<'_>, ty: &Arc<Type>) -> usize {
    match check_int(v, ty) {
        Some(word) => word,
        None => panic!(
            "{}",
            TypeAssertionError {
                interface: v.tab.inter.to_string(),
                concrete: v.tab.ty.name.clone(),
                asserted: ty.name.clone(),
            }
        ),
    }
}

pub fn check_int(v: &Interface<'_>, ty: &Arc<Type>) -> Option<usize> {
    if Type::same(&v.tab.ty, ty) {
        Some(v.data as usize)
    } else {
        None
    }
}
