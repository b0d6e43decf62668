/// Implements the standard traits shared by the tree maps.
///
/// The map type must be a struct with a `raw: RawTree<E>`
/// field and inherent `new`, `iter` and `insert` methods.
macro_rules! impl_map_traits {
    ($map:ident) => {
        impl<E: Clone> Clone for $map<E> {
            fn clone(&self) -> Self {
                $map { raw: self.raw.clone() }
            }
        }

        impl<E: PartialEq> PartialEq for $map<E> {
            fn eq(&self, other: &Self) -> bool {
                self.iter().len() == other.iter().len() && self.iter().eq(other.iter())
            }
        }

        impl<E: Eq> Eq for $map<E> {}

        impl<E: core::fmt::Debug> core::fmt::Debug for $map<E> {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        impl<E> Default for $map<E> {
            fn default() -> Self {
                $map::new()
            }
        }

        impl<E: Ord + Merge> FromIterator<E> for $map<E> {
            fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
                let mut map = $map::new();
                map.extend(iter);
                map
            }
        }

        impl<E: Ord + Merge> Extend<E> for $map<E> {
            fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
                for element in iter {
                    self.insert(element);
                }
            }
        }

        impl<'a, E> IntoIterator for &'a $map<E> {
            type Item = &'a E;
            type IntoIter = Iter<'a, E>;

            fn into_iter(self) -> Iter<'a, E> {
                self.iter()
            }
        }
    };
}
