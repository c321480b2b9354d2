use fastref_core::{FqName, Name, PackageName};
use fastref_syntax::FileHeader;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportDirective {
    /// `import a.b.C` or `import a.b.C as D`; `binding` is the name placed in scope.
    Explicit { fq_name: FqName, binding: Name },
    /// `import a.b.*`
    Wildcard { package: PackageName },
}

impl ImportDirective {
    pub fn explicit(fq_name: FqName) -> Self {
        let binding = fq_name.simple_name().clone();
        Self::Explicit { fq_name, binding }
    }

    pub fn aliased(fq_name: FqName, alias: Name) -> Self {
        Self::Explicit {
            fq_name,
            binding: alias,
        }
    }

    pub fn wildcard(package: PackageName) -> Self {
        Self::Wildcard { package }
    }
}

/// The package and imports of the file containing a reference.
///
/// Built per query from the file's header; nothing here is cached across files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileContext {
    package: PackageName,
    imports: Vec<ImportDirective>,
}

impl FileContext {
    pub fn new(package: PackageName, imports: Vec<ImportDirective>) -> Self {
        Self { package, imports }
    }

    /// Lowers a parsed header. Aliased imports bind the alias, star imports become
    /// wildcards.
    #[must_use]
    pub fn from_header(header: &FileHeader) -> Self {
        let mut out = FileContext {
            package: header
                .package
                .clone()
                .map(PackageName::from)
                .unwrap_or_default(),
            imports: Vec::with_capacity(header.imports.len()),
        };

        for import in &header.imports {
            if import.is_star {
                out.imports
                    .push(ImportDirective::wildcard(PackageName::from(import.path.clone())));
                continue;
            }

            let Some(fq_name) = FqName::from_qualified(import.path.clone()) else {
                continue;
            };
            if let Some(binding) = import.bound_name() {
                out.imports.push(ImportDirective::Explicit {
                    fq_name,
                    binding: binding.clone(),
                });
            }
        }

        out
    }

    /// Appends wildcard imports for packages the language imports implicitly.
    #[must_use]
    pub fn with_implicit_imports(mut self, packages: &[PackageName]) -> Self {
        self.imports.extend(
            packages
                .iter()
                .cloned()
                .map(ImportDirective::wildcard),
        );
        self
    }

    #[must_use]
    pub fn with_package(mut self, package: PackageName) -> Self {
        self.package = package;
        self
    }

    #[must_use]
    pub fn with_import(mut self, import: ImportDirective) -> Self {
        self.imports.push(import);
        self
    }

    #[inline]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    #[inline]
    pub fn imports(&self) -> &[ImportDirective] {
        &self.imports
    }

    /// Explicit imports as `(fq_name, binding)` pairs, in file order.
    pub fn explicit_imports(&self) -> impl Iterator<Item = (&FqName, &Name)> + '_ {
        self.imports.iter().filter_map(|import| match import {
            ImportDirective::Explicit { fq_name, binding } => Some((fq_name, binding)),
            ImportDirective::Wildcard { .. } => None,
        })
    }

    pub fn has_wildcard(&self, package: &PackageName) -> bool {
        self.imports.iter().any(|import| {
            matches!(import, ImportDirective::Wildcard { package: p } if p == package)
        })
    }

    /// Whether unqualified names declared in `package` are in scope without an
    /// explicit import: through a wildcard import, or because the file itself lives
    /// in that package.
    pub fn has_ambient_access(&self, package: &PackageName) -> bool {
        &self.package == package || self.has_wildcard(package)
    }
}
