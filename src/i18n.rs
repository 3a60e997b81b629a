use crate::locale::Locale;
use crate::models::{MediaType, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Home,
    Movies,
    TvShows,
    SearchPlaceholder,
    SearchButton,
    LoadMore,
    NoResults,
    NotFoundTitle,
    NotFoundBody,
    BackHome,
    Overview,
    Cast,
    Trailer,
    Recommendations,
    Genres,
    Runtime,
    Minutes,
    Seasons,
    Episodes,
    Released,
    Rating,
    Status,
    Director,
    Creator,
    Previous,
    Next,
    Language,
    BackToTop,
    HomeTitle,
    HomeDescription,
    Tagline,
}

pub fn t(locale: Locale, label: Label) -> &'static str {
    use Label::*;
    match (label, locale) {
        (Home, Locale::En) => "Home",
        (Home, Locale::Id) => "Beranda",
        (Movies, Locale::En) => "Movies",
        (Movies, Locale::Id) => "Film",
        (TvShows, Locale::En) => "TV Shows",
        (TvShows, Locale::Id) => "Serial TV",
        (SearchPlaceholder, Locale::En) => "Search movies and TV shows…",
        (SearchPlaceholder, Locale::Id) => "Cari film dan serial TV…",
        (SearchButton, Locale::En) => "Search",
        (SearchButton, Locale::Id) => "Cari",
        (LoadMore, Locale::En) => "Load more",
        (LoadMore, Locale::Id) => "Muat lebih banyak",
        (NoResults, Locale::En) => "Nothing to show here yet.",
        (NoResults, Locale::Id) => "Belum ada yang bisa ditampilkan.",
        (NotFoundTitle, Locale::En) => "Page not found",
        (NotFoundTitle, Locale::Id) => "Halaman tidak ditemukan",
        (NotFoundBody, Locale::En) => "The page you are looking for does not exist or has moved.",
        (NotFoundBody, Locale::Id) => "Halaman yang Anda cari tidak ada atau sudah dipindahkan.",
        (BackHome, Locale::En) => "Back to home",
        (BackHome, Locale::Id) => "Kembali ke beranda",
        (Overview, Locale::En) => "Overview",
        (Overview, Locale::Id) => "Sinopsis",
        (Cast, Locale::En) => "Top cast",
        (Cast, Locale::Id) => "Pemeran utama",
        (Trailer, Locale::En) => "Trailer",
        (Trailer, Locale::Id) => "Cuplikan",
        (Recommendations, Locale::En) => "You may also like",
        (Recommendations, Locale::Id) => "Mungkin Anda juga suka",
        (Genres, Locale::En) => "Genres",
        (Genres, Locale::Id) => "Genre",
        (Runtime, Locale::En) => "Runtime",
        (Runtime, Locale::Id) => "Durasi",
        (Minutes, Locale::En) => "min",
        (Minutes, Locale::Id) => "menit",
        (Seasons, Locale::En) => "Seasons",
        (Seasons, Locale::Id) => "Musim",
        (Episodes, Locale::En) => "Episodes",
        (Episodes, Locale::Id) => "Episode",
        (Released, Locale::En) => "Released",
        (Released, Locale::Id) => "Rilis",
        (Rating, Locale::En) => "Rating",
        (Rating, Locale::Id) => "Nilai",
        (Status, Locale::En) => "Status",
        (Status, Locale::Id) => "Status",
        (Director, Locale::En) => "Director",
        (Director, Locale::Id) => "Sutradara",
        (Creator, Locale::En) => "Created by",
        (Creator, Locale::Id) => "Dibuat oleh",
        (Previous, Locale::En) => "Previous",
        (Previous, Locale::Id) => "Sebelumnya",
        (Next, Locale::En) => "Next",
        (Next, Locale::Id) => "Berikutnya",
        (Language, Locale::En) => "Language",
        (Language, Locale::Id) => "Bahasa",
        (BackToTop, Locale::En) => "Back to top",
        (BackToTop, Locale::Id) => "Kembali ke atas",
        (HomeTitle, Locale::En) => "Discover trending movies and TV shows",
        (HomeTitle, Locale::Id) => "Temukan film dan serial TV terpopuler",
        (HomeDescription, Locale::En) => {
            "Browse this week's trending and most popular movies and TV shows, with ratings, cast, trailers and recommendations."
        }
        (HomeDescription, Locale::Id) => {
            "Jelajahi film dan serial TV yang sedang tren dan paling populer minggu ini, lengkap dengan nilai, pemeran, cuplikan, dan rekomendasi."
        }
        (Tagline, Locale::En) => "Your guide to what to watch next",
        (Tagline, Locale::Id) => "Panduan tontonan Anda berikutnya",
    }
}

pub fn section_heading(locale: Locale, section: Section) -> &'static str {
    match (section, locale) {
        (Section::TrendingMovie, Locale::En) => "Trending movies this week",
        (Section::TrendingMovie, Locale::Id) => "Film tren minggu ini",
        (Section::TrendingTv, Locale::En) => "Trending TV shows this week",
        (Section::TrendingTv, Locale::Id) => "Serial TV tren minggu ini",
        (Section::PopularMovie, Locale::En) => "Popular movies",
        (Section::PopularMovie, Locale::Id) => "Film populer",
        (Section::PopularTv, Locale::En) => "Popular TV shows",
        (Section::PopularTv, Locale::Id) => "Serial TV populer",
    }
}

pub fn media_label(locale: Locale, media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => t(locale, Label::Movies),
        MediaType::Tv => t(locale, Label::TvShows),
    }
}

pub fn genre_heading(locale: Locale, media_type: MediaType, genre: &str) -> String {
    match (locale, media_type) {
        (Locale::En, MediaType::Movie) => format!("{genre} Movies"),
        (Locale::En, MediaType::Tv) => format!("{genre} TV Shows"),
        (Locale::Id, MediaType::Movie) => format!("Film {genre}"),
        (Locale::Id, MediaType::Tv) => format!("Serial TV {genre}"),
    }
}

pub fn year_heading(locale: Locale, media_type: MediaType, year: i32) -> String {
    match (locale, media_type) {
        (Locale::En, MediaType::Movie) => format!("Movies released in {year}"),
        (Locale::En, MediaType::Tv) => format!("TV shows first aired in {year}"),
        (Locale::Id, MediaType::Movie) => format!("Film rilisan tahun {year}"),
        (Locale::Id, MediaType::Tv) => format!("Serial TV tayang perdana tahun {year}"),
    }
}

pub fn listing_description(locale: Locale, heading: &str) -> String {
    match locale {
        Locale::En => format!("{heading}: browse titles sorted by popularity, with ratings and release dates."),
        Locale::Id => format!("{heading}: jelajahi judul yang diurutkan menurut popularitas, lengkap dengan nilai dan tanggal rilis."),
    }
}

pub fn search_heading(locale: Locale, query: &str) -> String {
    match locale {
        Locale::En => format!("Search results for “{query}”"),
        Locale::Id => format!("Hasil pencarian untuk “{query}”"),
    }
}

pub fn page_of(locale: Locale, page: u32, total: u32) -> String {
    match locale {
        Locale::En => format!("Page {page} of {total}"),
        Locale::Id => format!("Halaman {page} dari {total}"),
    }
}

/// Trust pages linked from every footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    About,
    PrivacyPolicy,
    Terms,
    Dmca,
    Contact,
}

impl StaticPage {
    pub const ALL: [StaticPage; 5] = [
        StaticPage::About,
        StaticPage::PrivacyPolicy,
        StaticPage::Terms,
        StaticPage::Dmca,
        StaticPage::Contact,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            StaticPage::About => "/about",
            StaticPage::PrivacyPolicy => "/privacy-policy",
            StaticPage::Terms => "/terms",
            StaticPage::Dmca => "/dmca",
            StaticPage::Contact => "/contact",
        }
    }

    pub fn title(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (StaticPage::About, Locale::En) => "About us",
            (StaticPage::About, Locale::Id) => "Tentang kami",
            (StaticPage::PrivacyPolicy, Locale::En) => "Privacy policy",
            (StaticPage::PrivacyPolicy, Locale::Id) => "Kebijakan privasi",
            (StaticPage::Terms, Locale::En) => "Terms of use",
            (StaticPage::Terms, Locale::Id) => "Ketentuan penggunaan",
            (StaticPage::Dmca, Locale::En) => "DMCA",
            (StaticPage::Dmca, Locale::Id) => "DMCA",
            (StaticPage::Contact, Locale::En) => "Contact",
            (StaticPage::Contact, Locale::Id) => "Kontak",
        }
    }

    /// Paragraphs of body copy; `{site}` is replaced with the site name.
    pub fn paragraphs(&self, locale: Locale) -> &'static [&'static str] {
        match (self, locale) {
            (StaticPage::About, Locale::En) => &[
                "{site} helps you decide what to watch next. We collect trending and popular movies and TV shows in one place, together with ratings, cast and trailers.",
                "Metadata and images are provided by The Movie Database (TMDB). {site} is not endorsed or certified by TMDB.",
            ],
            (StaticPage::About, Locale::Id) => &[
                "{site} membantu Anda memilih tontonan berikutnya. Kami mengumpulkan film dan serial TV yang sedang tren dan populer di satu tempat, lengkap dengan nilai, pemeran, dan cuplikan.",
                "Metadata dan gambar disediakan oleh The Movie Database (TMDB). {site} tidak didukung atau disertifikasi oleh TMDB.",
            ],
            (StaticPage::PrivacyPolicy, Locale::En) => &[
                "{site} does not require an account and does not collect personal information.",
                "We store a single cookie, lang_preference, to remember the language you picked. It expires after one year and is never shared.",
                "Our hosting provider may keep standard server logs such as IP addresses and requested pages for security purposes.",
            ],
            (StaticPage::PrivacyPolicy, Locale::Id) => &[
                "{site} tidak memerlukan akun dan tidak mengumpulkan informasi pribadi.",
                "Kami hanya menyimpan satu cookie, lang_preference, untuk mengingat bahasa pilihan Anda. Cookie ini berlaku satu tahun dan tidak pernah dibagikan.",
                "Penyedia hosting kami dapat menyimpan log server standar seperti alamat IP dan halaman yang diakses untuk keperluan keamanan.",
            ],
            (StaticPage::Terms, Locale::En) => &[
                "{site} is provided as is, for informational purposes only. Titles, descriptions and images belong to their respective owners.",
                "{site} does not host or stream any video content.",
            ],
            (StaticPage::Terms, Locale::Id) => &[
                "{site} disediakan apa adanya, hanya untuk tujuan informasi. Judul, deskripsi, dan gambar adalah milik pemiliknya masing-masing.",
                "{site} tidak menyimpan atau menayangkan konten video apa pun.",
            ],
            (StaticPage::Dmca, Locale::En) => &[
                "{site} respects intellectual property rights. All metadata is retrieved from a public third-party API and no files are hosted here.",
                "If you believe content on this site infringes your rights, send a notice through the contact page with the URL and proof of ownership.",
            ],
            (StaticPage::Dmca, Locale::Id) => &[
                "{site} menghormati hak kekayaan intelektual. Semua metadata diambil dari API pihak ketiga yang publik dan tidak ada berkas yang disimpan di sini.",
                "Jika Anda yakin konten di situs ini melanggar hak Anda, kirimkan pemberitahuan melalui halaman kontak beserta URL dan bukti kepemilikan.",
            ],
            (StaticPage::Contact, Locale::En) => &[
                "Questions, corrections or takedown requests are welcome.",
                "Reach us by email and we will get back to you within a few working days.",
            ],
            (StaticPage::Contact, Locale::Id) => &[
                "Pertanyaan, koreksi, atau permintaan penghapusan sangat kami terima.",
                "Hubungi kami melalui email dan kami akan membalas dalam beberapa hari kerja.",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_paths_are_unique() {
        let mut paths: Vec<_> = StaticPage::ALL.iter().map(|p| p.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), StaticPage::ALL.len());
    }

    #[test]
    fn headings_follow_locale_word_order() {
        assert_eq!(
            genre_heading(Locale::En, MediaType::Movie, "Action"),
            "Action Movies"
        );
        assert_eq!(
            genre_heading(Locale::Id, MediaType::Tv, "Drama"),
            "Serial TV Drama"
        );
        assert_eq!(page_of(Locale::Id, 2, 10), "Halaman 2 dari 10");
    }
}
